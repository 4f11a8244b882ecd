//! Preset validation with typed errors.
//!
//! The pipeline clamps out-of-range settings silently; validation exists
//! for the human authoring path, where "your trigger level 3.2 is outside
//! [-1, 1]" beats a knob that quietly pins at its stop.

use fosforo_core::ScopeSettings;
use thiserror::Error;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Parameter value out of range.
    #[error("parameter '{param}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Name of the parameter.
        param: &'static str,
        /// The value that was out of range.
        value: f32,
        /// Minimum allowed value.
        min: f32,
        /// Maximum allowed value.
        max: f32,
    },

    /// Non-finite parameter value.
    #[error("parameter '{param}' is not a finite number")]
    NotFinite {
        /// Name of the parameter.
        param: &'static str,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Check every numeric field of a settings record against its documented
/// range.
///
/// Returns all violations at once wrapped in
/// [`ValidationError::Multiple`] when there is more than one.
pub fn validate_settings(settings: &ScopeSettings) -> Result<(), ValidationError> {
    let mut errors = Vec::new();

    let checks: &[(&'static str, f32, f32, f32)] = &[
        ("time_div", settings.time_div, 50e-9, 0.5),
        ("trigger_level", settings.trigger_level, -1.0, 1.0),
        ("ampl_div_a", settings.ampl_div_a, 0.05, 40.0),
        ("ampl_div_b", settings.ampl_div_b, 0.05, 40.0),
        ("position_a", settings.position_a, -1.0, 1.0),
        ("position_b", settings.position_b, -1.0, 1.0),
        ("x_position", settings.x_position, -1.0, 1.0),
        ("coil_strength", settings.coil_strength, 0.01, 2.0),
        ("beam_inertia", settings.beam_inertia, 0.01, 2.0),
        ("field_damping", settings.field_damping, 1e-4, 0.999),
        ("signal_noise", settings.signal_noise, 0.0, 0.2),
        ("persistence", settings.persistence, 0.0, 0.95),
        ("velocity_dimming", settings.velocity_dimming, 0.0, 1.0),
        ("beam_power", settings.beam_power, 0.0, 2.0),
        ("time_segment", settings.time_segment, 0.001, 0.050),
        ("dot_opacity", settings.dot_opacity, 0.0, 1.0),
        ("sample_dot_opacity", settings.sample_dot_opacity, 0.0, 1.0),
        ("dot_size_variation", settings.dot_size_variation, 0.0, 4.0),
    ];

    for &(param, value, min, max) in checks {
        if !value.is_finite() {
            errors.push(ValidationError::NotFinite { param });
        } else if value < min || value > max {
            errors.push(ValidationError::OutOfRange {
                param,
                value,
                min,
                max,
            });
        }
    }

    let decay = settings.decay as f32;
    if !(512.0..=16384.0).contains(&decay) {
        errors.push(ValidationError::OutOfRange {
            param: "decay",
            value: decay,
            min: 512.0,
            max: 16384.0,
        });
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}
