//! Per-frame control settings for the scope.
//!
//! [`ScopeSettings`] is the value-copied bundle the host sends with every
//! frame request. Out-of-range values are never an error: [`sanitize`]
//! clamps every numeric field to its documented range, silently, the same
//! way front-panel knobs have hard stops. The pipeline calls it once per
//! frame so downstream stages can assume valid ranges.
//!
//! [`sanitize`]: ScopeSettings::sanitize

/// Which of the four display modes the scope is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DisplayMode {
    /// Channel A against the time base.
    #[default]
    A,
    /// Channel B against the time base.
    B,
    /// Both channels against the time base, drawn sequentially.
    Ab,
    /// Channel A drives X, channel B drives Y (Lissajous).
    Xy,
}

impl DisplayMode {
    /// Lowercase name as used by the host settings vocabulary.
    pub fn as_str(self) -> &'static str {
        match self {
            DisplayMode::A => "a",
            DisplayMode::B => "b",
            DisplayMode::Ab => "ab",
            DisplayMode::Xy => "xy",
        }
    }

    /// Parse a mode name; `None` for anything but "a", "b", "ab", "xy".
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "a" => Some(DisplayMode::A),
            "b" => Some(DisplayMode::B),
            "ab" => Some(DisplayMode::Ab),
            "xy" => Some(DisplayMode::Xy),
            _ => None,
        }
    }

    /// True for the modes that run trigger detection (everything but XY).
    #[inline]
    pub fn uses_trigger(self) -> bool {
        !matches!(self, DisplayMode::Xy)
    }
}

/// Which channel the trigger comparator watches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TriggerChannel {
    /// Trigger on channel A.
    #[default]
    A,
    /// Trigger on channel B.
    B,
}

/// The full per-frame settings bundle.
///
/// Field ranges are documented inline; [`sanitize`](Self::sanitize) enforces
/// them. Defaults match the front panel at power-on.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScopeSettings {
    /// Display mode.
    pub mode: DisplayMode,
    /// Seconds per horizontal division, [50 ns, 0.5 s].
    pub time_div: f32,
    /// Trigger comparator level, [-1, 1].
    pub trigger_level: f32,
    /// Channel the trigger watches.
    pub trigger_channel: TriggerChannel,
    /// Channel A gain multiplier, [0.05, 40].
    pub ampl_div_a: f32,
    /// Channel B gain multiplier, [0.05, 40].
    pub ampl_div_b: f32,
    /// Channel A vertical offset, [-1, 1].
    pub position_a: f32,
    /// Channel B vertical offset, [-1, 1].
    pub position_b: f32,
    /// Horizontal offset in XY mode, [-1, 1].
    pub x_position: f32,
    /// Deflection coil strength, [0.01, 2].
    pub coil_strength: f32,
    /// Beam mass term, [0.01, 2]. The floor avoids division explosion.
    pub beam_inertia: f32,
    /// Multiplicative velocity decay per step, (0, 1). 1 and above clamp
    /// to 0.999; an undamped beam never settles.
    pub field_damping: f32,
    /// Uniform noise amplitude added to both channels, [0, 0.2].
    pub signal_noise: f32,
    /// Phosphor afterglow retention per frame, [0, 0.95].
    pub persistence: f32,
    /// How strongly beam speed dims the trace, [0, 1].
    pub velocity_dimming: f32,
    /// Base beam energy, [0, 2].
    pub beam_power: f32,
    /// Temporal segment quantum in milliseconds, [0.001, 0.050].
    pub time_segment: f32,
    /// Maximum samples rendered per frame, [512, 16384].
    pub decay: u32,
    /// Enable debug overlays (interpolated/original point dots).
    pub debug_mode: bool,
    /// Opacity multiplier for direction-change dots, [0, 1].
    pub dot_opacity: f32,
    /// Opacity for the debug sample dots, [0, 1].
    pub sample_dot_opacity: f32,
    /// Debug multiplier applied to per-dot brightness, [0, 4].
    pub dot_size_variation: f32,
}

impl Default for ScopeSettings {
    fn default() -> Self {
        Self {
            mode: DisplayMode::A,
            time_div: 0.005,
            trigger_level: 0.0,
            trigger_channel: TriggerChannel::A,
            ampl_div_a: 1.0,
            ampl_div_b: 1.0,
            position_a: 0.0,
            position_b: 0.0,
            x_position: 0.0,
            coil_strength: 0.32,
            beam_inertia: 0.06,
            field_damping: 0.44,
            signal_noise: 0.0,
            persistence: 0.6,
            velocity_dimming: 0.8,
            beam_power: 1.0,
            time_segment: 0.01,
            decay: 8192,
            debug_mode: false,
            dot_opacity: 1.0,
            sample_dot_opacity: 0.5,
            dot_size_variation: 1.0,
        }
    }
}

impl ScopeSettings {
    /// Clamp every numeric field to its documented range, in place.
    ///
    /// Non-finite values collapse to the nearest bound of the range (NaN
    /// collapses to the minimum). Never fails; out-of-range input is not an
    /// error anywhere in the pipeline.
    pub fn sanitize(&mut self) {
        self.time_div = clamp_finite(self.time_div, 50e-9, 0.5);
        self.trigger_level = clamp_finite(self.trigger_level, -1.0, 1.0);
        self.ampl_div_a = clamp_finite(self.ampl_div_a, 0.05, 40.0);
        self.ampl_div_b = clamp_finite(self.ampl_div_b, 0.05, 40.0);
        self.position_a = clamp_finite(self.position_a, -1.0, 1.0);
        self.position_b = clamp_finite(self.position_b, -1.0, 1.0);
        self.x_position = clamp_finite(self.x_position, -1.0, 1.0);
        self.coil_strength = clamp_finite(self.coil_strength, 0.01, 2.0);
        self.beam_inertia = clamp_finite(self.beam_inertia, 0.01, 2.0);
        self.field_damping = clamp_finite(self.field_damping, 1e-4, 0.999);
        self.signal_noise = clamp_finite(self.signal_noise, 0.0, 0.2);
        self.persistence = clamp_finite(self.persistence, 0.0, 0.95);
        self.velocity_dimming = clamp_finite(self.velocity_dimming, 0.0, 1.0);
        self.beam_power = clamp_finite(self.beam_power, 0.0, 2.0);
        self.time_segment = clamp_finite(self.time_segment, 0.001, 0.050);
        self.decay = self.decay.clamp(512, 16384);
        self.dot_opacity = clamp_finite(self.dot_opacity, 0.0, 1.0);
        self.sample_dot_opacity = clamp_finite(self.sample_dot_opacity, 0.0, 1.0);
        self.dot_size_variation = clamp_finite(self.dot_size_variation, 0.0, 4.0);
    }

    /// A sanitized copy of `self`.
    pub fn sanitized(&self) -> Self {
        let mut s = self.clone();
        s.sanitize();
        s
    }
}

/// Clamp to [min, max], collapsing NaN to `min`.
#[inline]
fn clamp_finite(v: f32, min: f32, max: f32) -> f32 {
    if v.is_nan() { min } else { v.clamp(min, max) }
}
