//! Catmull-Rom trajectory upsampling.
//!
//! Inserts synthetic points between adjacent trajectory samples so the
//! renderer sees a temporal resolution no coarser than the segment quantum.
//! The spline passes through every original point exactly, so upsampling
//! never moves the trace; it only refines the brightness granularity
//! between samples.
//!
//! The interpolant for a span (p1, p2) with neighbors p0 and p3 is the
//! uniform Catmull-Rom polynomial:
//!
//! ```text
//! c(t) = 0.5 * (2*p1
//!             + (p2 - p0) * t
//!             + (2*p0 - 5*p1 + 4*p2 - p3) * t^2
//!             + (3*p1 - 3*p2 + p3 - p0) * t^3)
//! ```
//!
//! Boundary spans replicate the edge point as the missing neighbor. Speed at
//! synthetic points is linearly interpolated from the span endpoints.

use alloc::vec::Vec;

use crate::beam::TracePoint;
use crate::math::{Point, lerp};

/// Evaluate the uniform Catmull-Rom spline at `t` in [0, 1] over the span
/// (p1, p2) with neighbors p0 and p3.
///
/// Exact at the endpoints: `t = 0` yields `p1`, `t = 1` yields `p2`.
#[inline]
pub fn catmull_rom(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * (2.0 * p1
        + (p2 - p0) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (3.0 * p1 - 3.0 * p2 + p3 - p0) * t3)
}

#[inline]
fn catmull_rom_point(p0: Point, p1: Point, p2: Point, p3: Point, t: f32) -> Point {
    Point::new(
        catmull_rom(p0.x, p1.x, p2.x, p3.x, t),
        catmull_rom(p0.y, p1.y, p2.y, p3.y, t),
    )
}

/// Upsample a trajectory to the segment time quantum.
///
/// `time_segment_ms` is the quantum in milliseconds. When the quantum is no
/// finer than the sample interval the input is returned unchanged
/// (pass-through). Otherwise every adjacent pair (p_i, p_{i+1}) expands to
/// `ceil(dt_sample / dt_segment)` points: the original p_i at `t = 0`
/// followed by synthetic points marked `interpolated`. The final original
/// point closes the output, so originals always survive verbatim.
pub fn interpolate_trajectory(
    points: &[TracePoint],
    sample_rate: f32,
    time_segment_ms: f32,
) -> Vec<TracePoint> {
    let dt_sample = 1.0 / sample_rate.max(1.0);
    let dt_segment = time_segment_ms.max(1e-6) / 1000.0;
    if dt_segment >= dt_sample || points.len() < 2 {
        return points.to_vec();
    }

    // ceil without touching float rounding at exact multiples
    let per_span = div_ceil_f32(dt_sample, dt_segment);
    let mut out = Vec::with_capacity(points.len() * per_span);

    for i in 0..points.len() - 1 {
        let p1 = points[i];
        let p2 = points[i + 1];
        // Edge replication for the missing neighbors.
        let p0 = if i == 0 { points[0] } else { points[i - 1] };
        let p3 = if i + 2 < points.len() {
            points[i + 2]
        } else {
            points[points.len() - 1]
        };

        out.push(p1);
        for j in 1..per_span {
            let t = j as f32 / per_span as f32;
            out.push(TracePoint {
                pos: catmull_rom_point(p0.pos, p1.pos, p2.pos, p3.pos, t),
                speed: lerp(p1.speed, p2.speed, t),
                interpolated: true,
            });
        }
    }
    out.push(points[points.len() - 1]);
    out
}

/// `ceil(a / b)` for positive floats, stable when `a` is an exact multiple.
#[inline]
fn div_ceil_f32(a: f32, b: f32) -> usize {
    let q = a / b;
    let floor = q as usize;
    if q - floor as f32 > 1e-6 { floor + 1 } else { floor.max(1) }
}
