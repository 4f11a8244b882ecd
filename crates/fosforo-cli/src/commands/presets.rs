//! `fosforo presets` - list, show, save, and delete settings presets.

use clap::{Args, Subcommand};

use fosforo_config::{
    ScopePreset, ensure_user_presets_dir, factory_preset_names, find_preset, list_user_presets,
    user_presets_dir, validate_settings,
};
use fosforo_core::ScopeSettings;

/// Arguments for the presets subcommand.
#[derive(Debug, Args)]
pub struct PresetsArgs {
    #[command(subcommand)]
    pub action: PresetAction,
}

/// Preset operations.
#[derive(Debug, Subcommand)]
pub enum PresetAction {
    /// List factory and user presets
    List,
    /// Show a preset as TOML, with validation diagnostics
    Show {
        /// Preset name
        name: String,
    },
    /// Save the power-on defaults as a new named preset to edit
    Save {
        /// Preset name
        name: String,
    },
    /// Delete a user preset
    Delete {
        /// Preset name
        name: String,
    },
}

/// Run the preset operation.
pub fn run(args: PresetsArgs) -> anyhow::Result<()> {
    match args.action {
        PresetAction::List => {
            println!("factory presets:");
            for name in factory_preset_names() {
                println!("  {name}");
            }
            let user = list_user_presets();
            if !user.is_empty() {
                println!("user presets ({}):", user_presets_dir().display());
                for name in user {
                    println!("  {name}");
                }
            }
        }

        PresetAction::Show { name } => {
            let preset = ScopePreset::load_named(&name)?;
            print!("{}", toml::to_string_pretty(&preset)?);
            if let Err(err) = validate_settings(&preset.settings) {
                eprintln!("warning: {err}");
            }
        }

        PresetAction::Save { name } => {
            let dir = ensure_user_presets_dir()?;
            let path = dir.join(format!("{name}.toml"));
            ScopePreset::new(name.clone(), ScopeSettings::default()).save(&path)?;
            println!("saved {}", path.display());
        }

        PresetAction::Delete { name } => {
            let Some(path) = find_preset(&name) else {
                anyhow::bail!("no user preset named '{name}'");
            };
            std::fs::remove_file(&path)?;
            println!("deleted {}", path.display());
        }
    }
    Ok(())
}
