//! `fosforo render` - drive the pipeline over a WAV file, frame by frame.
//!
//! Plays the role of the interactive host, offline: each animation tick
//! takes a window of samples from the capture, submits it through the
//! one-frame-in-flight protocol, and writes the returned framebuffer as a
//! numbered PNG. Because rendering is blocking here, no tick is ever
//! dropped; the backpressure path belongs to real-time hosts.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use fosforo_config::{HostPrefs, ScopePreset};
use fosforo_core::{DisplayMode, ScopeSettings};
use fosforo_pipeline::{FrameRequest, ScopeHost, SurfaceConfig};
use fosforo_render::RendererKind;

use crate::wav::read_stereo;

/// Arguments for the render subcommand.
#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Input WAV file (channel A = left, channel B = right)
    pub input: PathBuf,

    /// Output directory for the PNG sequence
    #[arg(short, long, default_value = "frames")]
    pub out_dir: PathBuf,

    /// Frames per second of the simulated display
    #[arg(long, default_value_t = 60.0)]
    pub fps: f32,

    /// Samples handed to the worker per frame
    #[arg(long, default_value_t = 16384)]
    pub window: usize,

    /// Maximum number of frames to render (whole file when omitted)
    #[arg(long)]
    pub frames: Option<u64>,

    /// Renderer backend ("software" or "gpu"; prefs file when omitted)
    #[arg(long)]
    pub renderer: Option<String>,

    /// Settings preset name to start from
    #[arg(long)]
    pub preset: Option<String>,

    /// Display mode override ("a", "b", "ab", "xy")
    #[arg(long)]
    pub mode: Option<String>,

    /// Persistence override in [0, 0.95]
    #[arg(long)]
    pub persistence: Option<f32>,

    /// Signal noise override in [0, 0.2]
    #[arg(long)]
    pub noise: Option<f32>,

    /// Canvas size in logical pixels (square)
    #[arg(long, default_value_t = 600)]
    pub size: u32,

    /// Enable debug overlays
    #[arg(long)]
    pub debug: bool,
}

/// Run the offline render loop.
pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let wav = read_stereo(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;

    let mut settings = match &args.preset {
        Some(name) => ScopePreset::load_named(name)?.settings,
        None => ScopeSettings::default(),
    };
    if let Some(mode) = &args.mode {
        settings.mode = DisplayMode::parse(mode)
            .with_context(|| format!("unknown mode '{mode}'"))?;
    }
    if let Some(p) = args.persistence {
        settings.persistence = p;
    }
    if let Some(n) = args.noise {
        settings.signal_noise = n;
    }
    settings.debug_mode = args.debug;
    settings.sanitize();

    let renderer = match &args.renderer {
        Some(name) => RendererKind::parse(name)
            .with_context(|| format!("unknown renderer '{name}'"))?,
        None => HostPrefs::load(HostPrefs::default_path())
            .ok()
            .and_then(|p| p.renderer)
            .and_then(|name| RendererKind::parse(&name))
            .unwrap_or_default(),
    };

    let (mut host, init) = ScopeHost::spawn(SurfaceConfig {
        logical_width: args.size,
        logical_height: args.size,
        device_pixel_ratio: 1.0,
        renderer,
    })?;
    info!(
        active = init.active.as_str(),
        available = ?init.available.iter().map(|k| k.as_str()).collect::<Vec<_>>(),
        "worker up"
    );

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    let hop = (wav.sample_rate as f32 / args.fps).max(1.0) as usize;
    let total_frames = (wav.left.len() / hop) as u64;
    let frame_count = args.frames.map_or(total_frames, |n| n.min(total_frames));

    let bar = ProgressBar::new(frame_count);
    bar.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} frames {msg}")
            .expect("static template"),
    );

    let dt_wall = 1.0 / args.fps;
    for frame in 0..frame_count {
        let start = frame as usize * hop;
        let end = (start + args.window).min(wav.left.len());
        let request = FrameRequest {
            samples_a: wav.left[start..end].to_vec(),
            samples_b: wav.right[start..end].to_vec(),
            sample_rate: wav.sample_rate as f32,
            settings: settings.clone(),
            dt_wall,
        };
        host.try_render(request)?;
        let ready = host.wait_ready()?;

        let path = args.out_dir.join(format!("frame_{frame:05}.png"));
        save_png(&ready.frame, &path)?;
        bar.set_message(format!("{:.1} ms", ready.stats.render_ms));
        bar.inc(1);
    }
    bar.finish();

    println!(
        "rendered {frame_count} frames to {} ({} backend)",
        args.out_dir.display(),
        init.active.as_str()
    );
    Ok(())
}

/// Encode a framebuffer snapshot as PNG.
fn save_png(frame: &fosforo_render::Framebuffer, path: &std::path::Path) -> anyhow::Result<()> {
    let image = image::RgbaImage::from_raw(frame.width(), frame.height(), frame.bytes().to_vec())
        .context("framebuffer size mismatch")?;
    image
        .save(path)
        .with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wav::write_stereo;

    #[test]
    fn renders_a_short_capture_to_pngs() {
        let dir = tempfile::tempdir().unwrap();
        let wav_path = dir.path().join("in.wav");
        let out_dir = dir.path().join("out");

        let rate = 48_000u32;
        let a: Vec<f32> = (0..(rate as usize / 4))
            .map(|i| (std::f32::consts::TAU * 440.0 * i as f32 / rate as f32).sin())
            .collect();
        let b: Vec<f32> = (0..(rate as usize / 4))
            .map(|i| (std::f32::consts::TAU * 440.0 * i as f32 / rate as f32).cos())
            .collect();
        write_stereo(&wav_path, &a, &b, rate).unwrap();

        run(RenderArgs {
            input: wav_path,
            out_dir: out_dir.clone(),
            fps: 60.0,
            window: 4096,
            frames: Some(3),
            renderer: Some("software".into()),
            preset: None,
            mode: Some("xy".into()),
            persistence: Some(0.0),
            noise: Some(0.0),
            size: 128,
            debug: false,
        })
        .unwrap();

        for i in 0..3 {
            let path = out_dir.join(format!("frame_{i:05}.png"));
            assert!(path.is_file(), "missing {}", path.display());
            let img = image::open(&path).unwrap().to_rgba8();
            assert_eq!(img.dimensions(), (128, 128));
        }
    }
}
