//! Electromagnetic beam deflection integrator.
//!
//! A discrete point-mass model of the electron beam: the deflection coils
//! pull the beam toward the current target with a spring-like force, the
//! beam carries inertia, and the deflection field damps velocity each step.
//! The update per target sample is:
//!
//! ```text
//! force    = (target - beam) * coil_strength
//! accel    = force / inertia
//! velocity = (velocity + accel) * damping
//! beam     = beam + velocity
//! smoothed = 0.6 * beam + 0.4 * smoothed
//! ```
//!
//! The integrator advances exactly one step per input sample, so its
//! response is a fixed number of samples regardless of wall-clock frame
//! timing. With the default constants (coil 0.32, inertia 0.06, damping
//! 0.44) the step response settles in roughly ten samples with a slight
//! ring, which is what rounds square-wave corners into the characteristic
//! CRT overshoot. The model is perceptually tuned, not physically correct;
//! the final smoothing stage is a one-pole lowpass on position.
//!
//! # State
//!
//! [`BeamState`] persists across frames; the beam never teleports to the
//! first target of a new frame. Reset happens on explicit [`reset`] or on a
//! display-mode change (the orchestrator's concern).
//!
//! [`reset`]: BeamState::reset

use alloc::vec::Vec;

use crate::math::{Point, flush_denormal};
use crate::settings::ScopeSettings;

/// One emitted trajectory position.
///
/// `speed` is pixels/second, derived from the distance to the previous
/// emitted position over the sample interval. `interpolated` marks points
/// synthesized by the Catmull-Rom upsampler; it only affects debug overlays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TracePoint {
    /// Smoothed beam position in device pixels.
    pub pos: Point,
    /// Scalar beam speed in pixels/second.
    pub speed: f32,
    /// True for points synthesized by interpolation.
    pub interpolated: bool,
}

/// Position smoothing weight applied to the freshly integrated beam.
const SMOOTHING_NEW: f32 = 0.6;
/// Position smoothing weight applied to the previous smoothed position.
const SMOOTHING_OLD: f32 = 0.4;

/// Lower floor for the inertia divisor.
const INERTIA_FLOOR: f32 = 0.01;
/// Ceiling for damping; an undamped beam never settles.
const DAMPING_CEILING: f32 = 0.999;

/// Persistent integrator state for one beam.
///
/// # Invariants
///
/// - All six components are finite after every [`step`](Self::step); a NaN
///   or Inf produced by a runaway parameter combination resets the state to
///   the origin instead of propagating.
/// - Velocity components below 1e-30 flush to zero (denormal guard; the
///   multiplicative damping otherwise shrinks them forever).
#[derive(Debug, Clone, Default)]
pub struct BeamState {
    /// Raw integrated beam position.
    bx: f32,
    by: f32,
    /// Beam velocity in pixels per sample step.
    vx: f32,
    vy: f32,
    /// Smoothed beam position, the emitted trajectory.
    sbx: f32,
    sby: f32,
    /// Set once a divergence has been reported, so a pathological settings
    /// combination logs once instead of every sample.
    diverged_logged: bool,
}

impl BeamState {
    /// Create a beam state at the origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset position, velocity, and smoothing to the origin.
    pub fn reset(&mut self) {
        *self = Self {
            diverged_logged: self.diverged_logged,
            ..Self::default()
        };
    }

    /// Current smoothed beam position.
    #[inline]
    pub fn position(&self) -> Point {
        Point::new(self.sbx, self.sby)
    }

    /// Current raw (unsmoothed) beam position.
    #[inline]
    pub fn raw_position(&self) -> Point {
        Point::new(self.bx, self.by)
    }

    /// Advance the integrator by one target sample.
    ///
    /// Returns the new smoothed position. Parameters arrive pre-sanitized
    /// from [`ScopeSettings`], but the floors are enforced here too since
    /// this is the place where a bad divisor becomes a NaN.
    #[inline]
    pub fn step(
        &mut self,
        target: Point,
        coil_strength: f32,
        beam_inertia: f32,
        field_damping: f32,
    ) -> Point {
        let inertia = beam_inertia.max(INERTIA_FLOOR);
        let damping = field_damping.min(DAMPING_CEILING);

        let ax = (target.x - self.bx) * coil_strength / inertia;
        let ay = (target.y - self.by) * coil_strength / inertia;

        self.vx = flush_denormal((self.vx + ax) * damping);
        self.vy = flush_denormal((self.vy + ay) * damping);

        self.bx += self.vx;
        self.by += self.vy;

        self.sbx = SMOOTHING_NEW * self.bx + SMOOTHING_OLD * self.sbx;
        self.sby = SMOOTHING_NEW * self.by + SMOOTHING_OLD * self.sby;

        if !self.is_finite() {
            self.on_divergence();
        }

        Point::new(self.sbx, self.sby)
    }

    /// Run the integrator over a whole frame of targets.
    ///
    /// Emits one [`TracePoint`] per target. Speed is in pixels/second,
    /// derived from the smoothed positions: the distance from the previous
    /// emitted position divided by the sample interval. The first point of
    /// a frame measures against the carried-over position of the previous
    /// frame, keeping speed continuous across frame boundaries.
    pub fn advance(
        &mut self,
        targets: &[Point],
        settings: &ScopeSettings,
        sample_rate: f32,
    ) -> Vec<TracePoint> {
        let rate = sample_rate.max(1.0);
        let mut out = Vec::with_capacity(targets.len());
        let mut prev = self.position();
        for &target in targets {
            let pos = self.step(
                target,
                settings.coil_strength,
                settings.beam_inertia,
                settings.field_damping,
            );
            let speed = prev.distance(pos) * rate;
            out.push(TracePoint {
                pos,
                speed,
                interpolated: false,
            });
            prev = pos;
        }
        out
    }

    fn is_finite(&self) -> bool {
        self.bx.is_finite()
            && self.by.is_finite()
            && self.vx.is_finite()
            && self.vy.is_finite()
            && self.sbx.is_finite()
            && self.sby.is_finite()
    }

    #[cold]
    fn on_divergence(&mut self) {
        if !self.diverged_logged {
            self.diverged_logged = true;
            #[cfg(feature = "tracing")]
            tracing::warn!("beam integrator diverged to non-finite state, resetting to origin");
        }
        self.reset();
    }
}
