//! Factory presets bundled with the library.
//!
//! A handful of front-panel starting points; user presets with the same
//! name shadow these.

use fosforo_core::{DisplayMode, ScopeSettings, TriggerChannel};

use crate::preset::ScopePreset;

/// Names of the bundled presets, in display order.
pub const FACTORY_PRESET_NAMES: &[&str] = &["timebase", "lissajous", "dual-trace", "slow-phosphor"];

/// All factory presets.
pub fn factory_presets() -> Vec<ScopePreset> {
    FACTORY_PRESET_NAMES
        .iter()
        .filter_map(|name| get_factory_preset(name))
        .collect()
}

/// Names of the bundled presets.
pub fn factory_preset_names() -> &'static [&'static str] {
    FACTORY_PRESET_NAMES
}

/// Look up one factory preset by name.
pub fn get_factory_preset(name: &str) -> Option<ScopePreset> {
    let preset = match name {
        "timebase" => ScopePreset {
            name: "timebase".into(),
            description: Some("Channel A against the time base, triggered".into()),
            settings: ScopeSettings {
                mode: DisplayMode::A,
                trigger_level: 0.0,
                trigger_channel: TriggerChannel::A,
                time_div: 0.002,
                persistence: 0.4,
                ..ScopeSettings::default()
            },
        },
        "lissajous" => ScopePreset {
            name: "lissajous".into(),
            description: Some("X/Y mode for phase figures".into()),
            settings: ScopeSettings {
                mode: DisplayMode::Xy,
                persistence: 0.7,
                velocity_dimming: 0.9,
                ..ScopeSettings::default()
            },
        },
        "dual-trace" => ScopePreset {
            name: "dual-trace".into(),
            description: Some("Both channels, offset apart".into()),
            settings: ScopeSettings {
                mode: DisplayMode::Ab,
                position_a: 0.5,
                position_b: -0.5,
                time_div: 0.002,
                ..ScopeSettings::default()
            },
        },
        "slow-phosphor" => ScopePreset {
            name: "slow-phosphor".into(),
            description: Some("Long afterglow for transients".into()),
            settings: ScopeSettings {
                mode: DisplayMode::Xy,
                persistence: 0.95,
                beam_power: 1.4,
                ..ScopeSettings::default()
            },
        },
        _ => return None,
    };
    Some(preset)
}
