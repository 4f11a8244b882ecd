//! Direction-change detection on the pre-physics point sequence.
//!
//! A real beam dwells at waveform apices: wherever the deflection reverses,
//! the spot lingers and burns a brighter dot. This stage finds those apices
//! by measuring the angle between successive sample-to-sample velocity
//! vectors on the ORIGINAL (pre-physics) points.
//!
//! Running on the original sequence is load-bearing: highlight positions
//! must not move when the interpolation quantum changes, so the detection
//! happens before any upsampling and indexes into the original points.

use alloc::vec::Vec;

use libm::{acosf, powf};

use crate::math::Point;

/// Brightness below which a direction change is not worth a dot.
pub const DIRECTION_VISIBILITY_FLOOR: f32 = 0.05;

/// Exponent shaping angle into brightness; gentle turns fade quickly.
const BRIGHTNESS_EXPONENT: f32 = 1.5;

/// A visible direction change at an original-sequence index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Highlight {
    /// Index into the original point sequence.
    pub index: usize,
    /// Dot brightness in (0.05, 1].
    pub brightness: f32,
}

/// Squared vector magnitude below which motion counts as a stop.
const STOP_EPSILON_SQ: f32 = 1e-12;

/// Find visible direction changes on an original point sequence.
///
/// For each interior point the incoming and outgoing velocity vectors span
/// an angle θ; brightness is `(θ / 180°)^1.5`. Entries below
/// [`DIRECTION_VISIBILITY_FLOOR`] are dropped.
///
/// A point with incoming motion and no outgoing motion is an arrival: the
/// beam stopped there, which is the maximal dwell, scored as a full 180°
/// reversal. Points with no incoming motion are skipped (the dwell was
/// already marked on arrival).
pub fn direction_changes(original: &[Point]) -> Vec<Highlight> {
    let mut out = Vec::new();
    if original.len() < 3 {
        return out;
    }

    for i in 1..original.len() - 1 {
        let vin_x = original[i].x - original[i - 1].x;
        let vin_y = original[i].y - original[i - 1].y;
        let vout_x = original[i + 1].x - original[i].x;
        let vout_y = original[i + 1].y - original[i].y;

        let in_sq = vin_x * vin_x + vin_y * vin_y;
        let out_sq = vout_x * vout_x + vout_y * vout_y;
        if in_sq <= STOP_EPSILON_SQ {
            continue;
        }

        let angle_deg = if out_sq <= STOP_EPSILON_SQ {
            180.0
        } else {
            let cos_theta =
                ((vin_x * vout_x + vin_y * vout_y) / libm::sqrtf(in_sq * out_sq)).clamp(-1.0, 1.0);
            acosf(cos_theta) * (180.0 / core::f32::consts::PI)
        };
        let brightness = powf(angle_deg / 180.0, BRIGHTNESS_EXPONENT);

        if brightness > DIRECTION_VISIBILITY_FLOOR {
            out.push(Highlight { index: i, brightness });
        }
    }
    out
}
