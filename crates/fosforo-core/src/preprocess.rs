//! Sample pre-processing: noise, trigger, window, pixel mapping.
//!
//! Turns the raw (A, B) sample buffers into ordered target positions in
//! device pixels, honoring mode, gain, position, trigger, and time-division
//! settings. The stages run in a fixed order per frame:
//!
//! 1. noise injection (uniform, additive on the normalized amplitude)
//! 2. trigger detection (time-base modes only)
//! 3. time-division windowing, clamped to the buffer and to `decay`
//! 4. amplitude-to-pixel mapping per display mode
//!
//! AB mode produces two passes (channel A, then channel B) that the
//! compositor renders in sequence on the same frame, through the same beam
//! state.
//!
//! Failure policy: silent. Mismatched or empty buffers yield an empty plan;
//! nothing here panics or errors.

use alloc::vec::Vec;

use crate::math::Point;
use crate::settings::{DisplayMode, ScopeSettings, TriggerChannel};
use crate::trigger::find_rising_edge;
use crate::viewport::{HORIZONTAL_DIVISIONS, Viewport};

/// One render pass worth of mapped points.
///
/// `targets` feeds the physics integrator; `original` is the identical
/// unsmoothed mapping kept for direction-change detection and the debug
/// overlay. They start out equal; separate vectors because their lifetimes
/// diverge downstream.
#[derive(Debug, Clone, Default)]
pub struct ChannelPass {
    /// Target positions for the beam integrator.
    pub targets: Vec<Point>,
    /// The same mapping, untouched by physics.
    pub original: Vec<Point>,
}

/// Everything the pre-processor produced for one frame.
#[derive(Debug, Clone, Default)]
pub struct FramePlan {
    /// One pass for A/B/XY modes, two for AB.
    pub passes: Vec<ChannelPass>,
}

/// Frame pre-processor.
///
/// Owns the noise generator so repeated frames draw from one RNG sequence.
/// With `signal_noise == 0` the noise stage is skipped entirely and the
/// output is bit-deterministic.
pub struct Preprocessor {
    rng: fastrand::Rng,
}

impl Preprocessor {
    /// Create a pre-processor with an entropy-seeded noise generator.
    #[cfg(feature = "std")]
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    /// Create a pre-processor with a fixed noise seed (deterministic).
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Run the full pre-processing chain for one frame.
    ///
    /// `a` and `b` must be equal-length; a mismatch is treated as empty
    /// input. Settings are expected pre-sanitized (the orchestrator calls
    /// [`ScopeSettings::sanitize`] once per frame).
    pub fn process_frame(
        &mut self,
        a: &[f32],
        b: &[f32],
        sample_rate: f32,
        settings: &ScopeSettings,
        viewport: &Viewport,
    ) -> FramePlan {
        if a.is_empty() || a.len() != b.len() {
            return FramePlan::default();
        }

        let mut ch_a = a.to_vec();
        let mut ch_b = b.to_vec();

        if settings.signal_noise > 0.0 {
            self.inject_noise(&mut ch_a, settings.signal_noise);
            self.inject_noise(&mut ch_b, settings.signal_noise);
        }

        let start = if settings.mode.uses_trigger() {
            let channel: &[f32] = match settings.trigger_channel {
                TriggerChannel::A => &ch_a,
                TriggerChannel::B => &ch_b,
            };
            find_rising_edge(channel, settings.trigger_level)
        } else {
            0
        };
        let ch_a = &ch_a[start..];
        let ch_b = &ch_b[start..];

        let window = window_len(ch_a.len(), sample_rate, settings);
        let ch_a = &ch_a[..window];
        let ch_b = &ch_b[..window];

        let passes = match settings.mode {
            DisplayMode::Xy => alloc::vec![map_xy(ch_a, ch_b, settings, viewport)],
            DisplayMode::A => alloc::vec![map_timebase(ch_a, TimebaseChannel::A, settings, viewport)],
            DisplayMode::B => alloc::vec![map_timebase(ch_b, TimebaseChannel::B, settings, viewport)],
            DisplayMode::Ab => alloc::vec![
                map_timebase(ch_a, TimebaseChannel::A, settings, viewport),
                map_timebase(ch_b, TimebaseChannel::B, settings, viewport),
            ],
        };

        FramePlan { passes }
    }

    /// Add an independent uniform perturbation in `[-amount, +amount]` to
    /// every sample, before gain.
    fn inject_noise(&mut self, samples: &mut [f32], amount: f32) {
        for s in samples.iter_mut() {
            *s += (self.rng.f32() * 2.0 - 1.0) * amount;
        }
    }
}

#[cfg(feature = "std")]
impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Window length: `floor(sample_rate * time_div * divisions)` samples,
/// clamped to the available buffer and to the `decay` render budget.
fn window_len(available: usize, sample_rate: f32, settings: &ScopeSettings) -> usize {
    let spanned = (sample_rate * settings.time_div * HORIZONTAL_DIVISIONS) as usize;
    spanned.min(available).min(settings.decay as usize)
}

/// Which channel a time-base pass reads, selecting gain and offset.
#[derive(Clone, Copy)]
enum TimebaseChannel {
    A,
    B,
}

/// XY mode: channel A deflects X, channel B deflects Y.
fn map_xy(a: &[f32], b: &[f32], settings: &ScopeSettings, viewport: &Viewport) -> ChannelPass {
    let (cx, cy) = viewport.center();
    let scale = viewport.amplitude_scale();
    let targets: Vec<Point> = a
        .iter()
        .zip(b.iter())
        .map(|(&sa, &sb)| {
            Point::new(
                cx + (settings.x_position + sa * settings.ampl_div_a) * scale,
                cy - (settings.position_b + sb * settings.ampl_div_b) * scale,
            )
        })
        .collect();
    ChannelPass {
        original: targets.clone(),
        targets,
    }
}

/// Time-base modes: X ramps linearly across the window, Y follows the
/// selected channel.
fn map_timebase(
    samples: &[f32],
    channel: TimebaseChannel,
    settings: &ScopeSettings,
    viewport: &Viewport,
) -> ChannelPass {
    let (_, cy) = viewport.center();
    let scale = viewport.amplitude_scale();
    let (position, gain) = match channel {
        TimebaseChannel::A => (settings.position_a, settings.ampl_div_a),
        TimebaseChannel::B => (settings.position_b, settings.ampl_div_b),
    };
    let span = samples.len().saturating_sub(1).max(1) as f32;
    let targets: Vec<Point> = samples
        .iter()
        .enumerate()
        .map(|(i, &s)| {
            Point::new(
                i as f32 / span * viewport.width,
                cy - (position + s * gain) * scale,
            )
        })
        .collect();
    ChannelPass {
        original: targets.clone(),
        targets,
    }
}
