//! Preset and preference management for the fosforo scope.
//!
//! The core is stateless across restarts; everything worth keeping lives
//! here as TOML files under the platform config directory:
//!
//! - **Presets**: named [`ScopePreset`] files bundling a full settings
//!   record, loadable by name from the user presets directory
//! - **Preferences**: the host-side rendezvous state, currently the
//!   preferred renderer backend that must survive a worker rebuild after a
//!   failed in-place switch
//! - **Validation**: range checks with typed errors for hand-authored
//!   preset files (the pipeline itself clamps silently; validation exists
//!   so `fosforo presets show` can tell an author *why* a knob is off)
//!
//! # Example
//!
//! ```rust,no_run
//! use fosforo_config::{ScopePreset, user_presets_dir};
//!
//! let preset = ScopePreset::load_named("lissajous").unwrap();
//! let path = user_presets_dir().join("mine.toml");
//! preset.save(&path).unwrap();
//! ```

mod error;
mod preset;
mod prefs;

/// Platform-specific paths for presets and preferences.
pub mod paths;

/// Preset validation with typed errors.
pub mod validation;

/// Factory presets bundled with the library.
pub mod factory_presets;

pub use error::ConfigError;
pub use factory_presets::{factory_preset_names, factory_presets, get_factory_preset};
pub use prefs::HostPrefs;
pub use preset::ScopePreset;
pub use paths::{
    ensure_user_config_dir, ensure_user_presets_dir, find_preset, list_user_presets,
    preset_name_from_path, user_config_dir, user_presets_dir,
};
pub use validation::{ValidationError, validate_settings};
