//! `fosforo generate` - write test signals as WAV files.

use std::f32::consts::TAU;
use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::wav::write_stereo;

/// Which canonical test signal to produce on (A, B).
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Signal {
    /// Sine on both channels (B phase-shifted 90 degrees).
    Sine,
    /// Sine/cosine pair: a circle in XY mode.
    Circle,
    /// Square pair in quadrature: a rectangle with corner dwell.
    SquarePair,
    /// Two detuned sines: a slowly precessing Lissajous figure.
    Lissajous,
    /// Silence (DC zero) on both channels.
    Silence,
}

/// Arguments for the generate subcommand.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Signal shape
    #[arg(long, value_enum, default_value = "circle")]
    pub signal: Signal,

    /// Fundamental frequency in Hz
    #[arg(long, default_value_t = 440.0)]
    pub freq: f32,

    /// Duration in seconds
    #[arg(long, default_value_t = 2.0)]
    pub duration: f32,

    /// Sample rate in Hz
    #[arg(long, default_value_t = 48_000)]
    pub rate: u32,

    /// Output WAV path
    #[arg(short, long)]
    pub output: PathBuf,
}

/// Run signal generation.
pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
    let n = (args.duration.max(0.0) * args.rate as f32) as usize;
    let rate = args.rate as f32;
    let omega = TAU * args.freq / rate;

    let (a, b): (Vec<f32>, Vec<f32>) = match args.signal {
        Signal::Sine => (0..n)
            .map(|i| {
                let p = omega * i as f32;
                (p.sin(), (p + TAU / 4.0).sin())
            })
            .unzip(),
        Signal::Circle => (0..n)
            .map(|i| {
                let p = omega * i as f32;
                (p.sin(), p.cos())
            })
            .unzip(),
        Signal::SquarePair => (0..n)
            .map(|i| {
                let p = (i as f32 * args.freq / rate).fract();
                let q = (i as f32 * args.freq / rate + 0.25).fract();
                (
                    if p < 0.5 { 1.0 } else { -1.0 },
                    if q < 0.5 { 1.0 } else { -1.0 },
                )
            })
            .unzip(),
        Signal::Lissajous => (0..n)
            .map(|i| {
                let t = i as f32;
                ((omega * t).sin(), (omega * 1.5 * t + 0.3).sin())
            })
            .unzip(),
        Signal::Silence => (vec![0.0; n], vec![0.0; n]),
    };

    write_stereo(&args.output, &a, &b, args.rate)?;
    println!(
        "wrote {} frames ({:.2} s) to {}",
        a.len(),
        args.duration,
        args.output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wav::read_stereo;

    #[test]
    fn circle_signal_is_quadrature() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.wav");
        run(GenerateArgs {
            signal: Signal::Circle,
            freq: 100.0,
            duration: 0.1,
            rate: 48_000,
            output: path.clone(),
        })
        .unwrap();

        let wav = read_stereo(&path).unwrap();
        assert_eq!(wav.left.len(), 4800);
        // sin^2 + cos^2 = 1 pointwise.
        for (s, c) in wav.left.iter().zip(wav.right.iter()).take(512) {
            assert!((s * s + c * c - 1.0).abs() < 0.01);
        }
    }
}
