//! Temporal segmentation of the trajectory.
//!
//! Groups consecutive (possibly interpolated) points into segments whose
//! wall-clock duration equals the segment quantum. Each segment is stroked
//! at a single opacity derived from its mean speed, so the quantum governs
//! the granularity of brightness variation along the trace.
//!
//! Adjacent segments share their boundary point; the stroked polylines stay
//! connected with no gaps.

use alloc::vec::Vec;

use crate::beam::TracePoint;

/// A run of trajectory points covering one time quantum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Index of the first point (inclusive).
    pub start: usize,
    /// Index of the last point (inclusive); shared with the next segment.
    pub end: usize,
    /// Arithmetic mean of the per-point speeds in `[start, end]`,
    /// pixels/second.
    pub mean_speed: f32,
}

/// Group trajectory points into quantum-duration segments.
///
/// Per-point time advance is the quantum itself when the trajectory was
/// interpolated (the upsampler spaced points at the quantum), otherwise the
/// sample interval. The tail is always closed even when it spans less than
/// a full quantum.
pub fn segment_trajectory(
    points: &[TracePoint],
    sample_rate: f32,
    time_segment_ms: f32,
    interpolated: bool,
) -> Vec<Segment> {
    if points.len() < 2 {
        return Vec::new();
    }

    let quantum = time_segment_ms.max(1e-6) / 1000.0;
    let dt_point = if interpolated {
        quantum
    } else {
        1.0 / sample_rate.max(1.0)
    };

    let mut segments = Vec::new();
    let mut seg_start = 0usize;
    let mut accumulated = 0.0f32;

    for i in 1..points.len() {
        accumulated += dt_point;
        if accumulated >= quantum {
            segments.push(close(points, seg_start, i));
            seg_start = i;
            accumulated = 0.0;
        }
    }
    if seg_start < points.len() - 1 {
        segments.push(close(points, seg_start, points.len() - 1));
    }
    segments
}

fn close(points: &[TracePoint], start: usize, end: usize) -> Segment {
    let count = (end - start + 1) as f32;
    let sum: f32 = points[start..=end].iter().map(|p| p.speed).sum();
    Segment {
        start,
        end,
        mean_speed: sum / count,
    }
}
