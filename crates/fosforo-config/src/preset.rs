//! Named settings presets, stored as TOML.

use std::path::Path;

use fosforo_core::ScopeSettings;
use serde::{Deserialize, Serialize};

use crate::ConfigError;
use crate::factory_presets::get_factory_preset;
use crate::paths::find_preset;

/// A named, persistable settings bundle.
///
/// The settings record round-trips through TOML with every field optional
/// (missing fields take their power-on defaults), so preset files written
/// by older versions keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopePreset {
    /// Display name.
    pub name: String,
    /// Optional free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The settings this preset applies.
    pub settings: ScopeSettings,
}

impl ScopePreset {
    /// Build a preset around a settings record.
    pub fn new(name: impl Into<String>, settings: ScopeSettings) -> Self {
        Self {
            name: name.into(),
            description: None,
            settings,
        }
    }

    /// Load a preset from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let preset: ScopePreset = toml::from_str(&text)?;
        Ok(preset)
    }

    /// Resolve a preset by name: user presets directory first, factory
    /// presets second.
    pub fn load_named(name: &str) -> Result<Self, ConfigError> {
        if let Some(path) = find_preset(name) {
            return Self::load(path);
        }
        get_factory_preset(name).ok_or_else(|| ConfigError::PresetNotFound(name.to_string()))
    }

    /// Save the preset as TOML, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }
        let text = toml::to_string_pretty(self)?;
        std::fs::write(path, text).map_err(|e| ConfigError::write_file(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fosforo_core::DisplayMode;

    #[test]
    fn toml_round_trip_preserves_settings() {
        let preset = ScopePreset {
            name: "test".into(),
            description: Some("round trip".into()),
            settings: ScopeSettings {
                mode: DisplayMode::Xy,
                persistence: 0.85,
                coil_strength: 0.5,
                ..ScopeSettings::default()
            },
        };
        let text = toml::to_string_pretty(&preset).unwrap();
        let back: ScopePreset = toml::from_str(&text).unwrap();
        assert_eq!(back, preset);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let text = r#"
            name = "sparse"
            [settings]
            mode = "xy"
            persistence = 0.9
        "#;
        let preset: ScopePreset = toml::from_str(text).unwrap();
        assert_eq!(preset.settings.mode, DisplayMode::Xy);
        assert_eq!(preset.settings.persistence, 0.9);
        assert_eq!(
            preset.settings.decay,
            ScopeSettings::default().decay,
            "unspecified fields keep power-on defaults"
        );
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("p.toml");
        let preset = ScopePreset::new("disk", ScopeSettings::default());
        preset.save(&path).unwrap();
        assert_eq!(ScopePreset::load(&path).unwrap(), preset);
    }

    #[test]
    fn load_named_falls_back_to_factory() {
        let preset = ScopePreset::load_named("lissajous").unwrap();
        assert_eq!(preset.settings.mode, DisplayMode::Xy);
        assert!(matches!(
            ScopePreset::load_named("definitely-not-a-preset"),
            Err(ConfigError::PresetNotFound(_))
        ));
    }
}
