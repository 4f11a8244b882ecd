//! Platform-specific paths for presets and preferences.
//!
//! - **User presets**: `~/.config/fosforo/presets/` (Linux),
//!   `~/Library/Application Support/fosforo/presets/` (macOS),
//!   `%APPDATA%\fosforo\presets\` (Windows)
//! - **Preferences**: `prefs.toml` next to the presets directory

use std::path::PathBuf;

/// Application name used for directory paths.
const APP_NAME: &str = "fosforo";

/// Subdirectory name for presets.
const PRESETS_SUBDIR: &str = "presets";

/// Returns the user-specific configuration directory.
///
/// Falls back to the current directory when the platform config dir
/// cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the user-specific presets directory.
pub fn user_presets_dir() -> PathBuf {
    user_config_dir().join(PRESETS_SUBDIR)
}

/// Create the user config directory if missing and return it.
pub fn ensure_user_config_dir() -> Result<PathBuf, crate::ConfigError> {
    let dir = user_config_dir();
    std::fs::create_dir_all(&dir).map_err(|e| crate::ConfigError::create_dir(&dir, e))?;
    Ok(dir)
}

/// Create the user presets directory if missing and return it.
pub fn ensure_user_presets_dir() -> Result<PathBuf, crate::ConfigError> {
    let dir = user_presets_dir();
    std::fs::create_dir_all(&dir).map_err(|e| crate::ConfigError::create_dir(&dir, e))?;
    Ok(dir)
}

/// Find a preset file by name in the user presets directory.
///
/// The name maps to `<name>.toml`; returns `None` when the file does not
/// exist (factory presets are matched separately by the caller).
pub fn find_preset(name: &str) -> Option<PathBuf> {
    let candidate = user_presets_dir().join(format!("{name}.toml"));
    candidate.is_file().then_some(candidate)
}

/// List the preset names present in the user presets directory, sorted.
pub fn list_user_presets() -> Vec<String> {
    let mut names = Vec::new();
    if let Ok(entries) = std::fs::read_dir(user_presets_dir()) {
        for entry in entries.flatten() {
            if let Some(name) = preset_name_from_path(&entry.path()) {
                names.push(name);
            }
        }
    }
    names.sort();
    names
}

/// Extract the preset name from a `.toml` path.
pub fn preset_name_from_path(path: &std::path::Path) -> Option<String> {
    if path.extension().is_some_and(|e| e == "toml") {
        path.file_stem().map(|s| s.to_string_lossy().into_owned())
    } else {
        None
    }
}
