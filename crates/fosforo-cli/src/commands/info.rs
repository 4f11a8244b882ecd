//! `fosforo info` - WAV file metadata dump.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

/// Arguments for the info subcommand.
#[derive(Debug, Args)]
pub struct InfoArgs {
    /// WAV file to inspect
    pub input: PathBuf,
}

/// Print format, duration, and peak levels.
pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    let reader = hound::WavReader::open(&args.input)
        .with_context(|| format!("opening {}", args.input.display()))?;
    let spec = reader.spec();
    let frames = reader.duration();
    let secs = frames as f64 / f64::from(spec.sample_rate);

    println!("file:        {}", args.input.display());
    println!("channels:    {}", spec.channels);
    println!("sample rate: {} Hz", spec.sample_rate);
    println!(
        "format:      {}-bit {}",
        spec.bits_per_sample,
        match spec.sample_format {
            hound::SampleFormat::Int => "int",
            hound::SampleFormat::Float => "float",
        }
    );
    println!("duration:    {frames} frames ({secs:.3} s)");

    let wav = crate::wav::read_stereo(&args.input)?;
    let peak_a = wav.left.iter().fold(0.0f32, |m, s| m.max(s.abs()));
    let peak_b = wav.right.iter().fold(0.0f32, |m, s| m.max(s.abs()));
    println!("peak A:      {peak_a:.4}");
    println!("peak B:      {peak_b:.4}");
    Ok(())
}
