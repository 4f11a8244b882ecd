//! Fosforo CLI - offline host for the scope pipeline.
//!
//! Reads audio from WAV files, drives the render worker frame by frame,
//! and writes the resulting phosphor frames as PNG sequences. Also
//! generates the classic test signals and manages settings presets.

mod commands;
mod wav;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "fosforo")]
#[command(author, version, about = "CRT oscilloscope simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a WAV file to a PNG frame sequence
    Render(commands::render::RenderArgs),

    /// Generate test signals as WAV files
    Generate(commands::generate::GenerateArgs),

    /// List and manage settings presets
    Presets(commands::presets::PresetsArgs),

    /// Display WAV file information
    Info(commands::info::InfoArgs),
}

fn main() -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => commands::render::run(args),
        Commands::Generate(args) => commands::generate::run(args),
        Commands::Presets(args) => commands::presets::run(args),
        Commands::Info(args) => commands::info::run(args),
    }
}
