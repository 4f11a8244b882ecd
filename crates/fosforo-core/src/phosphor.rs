//! P31 phosphor excitation model.
//!
//! Maps a segment's mean beam speed to stroke opacity. A slow beam dwells
//! within one spot diameter and deposits full energy; a fast sweep spreads
//! the same current over more phosphor and dims. Above the saturation knee
//! the response compresses logarithmically toward an asymptote instead of
//! clipping, which is how real P31 behaves near saturation.
//!
//! ```text
//! bright  = min(1, power)                            speed < spot size
//! energy  = clamp(500 / speed, 0.02, 1)              otherwise
//! deposit = power * (dimming * energy + (1 - dimming))
//! bright  = deposit                                  deposit < knee
//!         = knee + log(1 + (deposit - knee) * K) / log(1 + K) * strength
//! ```
//!
//! The 2% energy floor keeps very fast sweeps faintly visible rather than
//! letting them vanish entirely.

use libm::logf;

/// Beam speed at which deposited energy falls to the unit reference,
/// pixels/second. Calibrated against a 600 px canvas.
pub const REFERENCE_VELOCITY: f32 = 500.0;

/// Beam spot diameter in pixels; below this speed the beam effectively
/// dwells in place.
pub const BEAM_SPOT_SIZE: f32 = 1.5;

/// Deposited-energy level above which brightness compresses.
pub const SATURATION_KNEE: f32 = 0.6;

/// Brightness span available above the knee.
pub const SATURATION_STRENGTH: f32 = 0.4;

/// Steepness of the logarithmic compression above the knee.
pub const SATURATION_K: f32 = 10.0;

/// Lower clamp on the velocity energy factor.
const ENERGY_FLOOR: f32 = 0.02;

/// Map segment speed to stroke brightness in [0, 1].
///
/// `velocity_dimming` blends between speed-independent output (0) and the
/// full dwell model (1); `base_power` scales the deposited energy before
/// saturation. Monotone non-increasing in `speed`, monotone non-decreasing
/// in `base_power`.
///
/// A beam dwelling within one spot diameter excites the phosphor directly
/// at base power, skipping the saturation curve: the dot of a stationary
/// beam renders at full commanded brightness.
pub fn excitation(speed: f32, velocity_dimming: f32, base_power: f32) -> f32 {
    if speed < BEAM_SPOT_SIZE {
        return base_power.clamp(0.0, 1.0);
    }

    let energy_factor = (REFERENCE_VELOCITY / speed).clamp(ENERGY_FLOOR, 1.0);

    let deposited = base_power * (velocity_dimming * energy_factor + (1.0 - velocity_dimming));

    let brightness = if deposited < SATURATION_KNEE {
        deposited
    } else {
        let excess = deposited - SATURATION_KNEE;
        let compressed = logf(1.0 + excess * SATURATION_K) / logf(1.0 + SATURATION_K);
        SATURATION_KNEE + compressed * SATURATION_STRENGTH
    };

    brightness.clamp(0.0, 1.0)
}
