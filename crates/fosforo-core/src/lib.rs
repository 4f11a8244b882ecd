//! Fosforo Core - beam and phosphor simulation primitives
//!
//! This crate provides the per-frame processing stages that turn a pair of
//! audio sample buffers into a strokable beam trajectory, modelled after an
//! analog CRT X/Y oscilloscope: an electron beam deflected by electromagnetic
//! coils, striking a persistent phosphor screen.
//!
//! # Pipeline Stages
//!
//! Data flows through the stages in order; each stage is a small, pure-ish
//! component with its own module:
//!
//! - [`Preprocessor`] - noise injection, trigger alignment, time-division
//!   windowing, and amplitude-to-pixel mapping per display mode
//! - [`BeamState`] - discrete electromagnetic deflection integrator producing
//!   a smoothed beam trajectory from target positions
//! - [`interp`] - Catmull-Rom upsampling of the trajectory to a time quantum
//!   finer than the input sample rate
//! - [`segment`] - grouping of trajectory points into fixed wall-clock
//!   segments for per-segment brightness
//! - [`phosphor`] - velocity-dependent excitation model with logarithmic
//!   saturation (P31 phosphor response)
//! - [`highlight`] - direction-change detection on the pre-physics points,
//!   producing dwell dots at waveform apices
//!
//! # Coordinate Space
//!
//! All positions are device pixels. The reference velocity (500 px/s), dot
//! radius, and line width are calibrated against a 600-pixel canvas; scaled
//! quantities derive from `min(width, height)` via [`Viewport`].
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible (with `alloc`) for embedded scope
//! frontends. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! fosforo-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use fosforo_core::{BeamState, Preprocessor, ScopeSettings, Viewport};
//!
//! let settings = ScopeSettings::default();
//! let viewport = Viewport::new(600.0, 600.0);
//! let a: Vec<f32> = (0..1024).map(|i| (i as f32 * 0.05).sin()).collect();
//! let b: Vec<f32> = (0..1024).map(|i| (i as f32 * 0.05).cos()).collect();
//!
//! let mut pre = Preprocessor::with_seed(7);
//! let plan = pre.process_frame(&a, &b, 48_000.0, &settings, &viewport);
//!
//! let mut beam = BeamState::new();
//! for pass in &plan.passes {
//!     let trajectory = beam.advance(&pass.targets, &settings, 48_000.0);
//!     assert_eq!(trajectory.len(), pass.targets.len());
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod beam;
pub mod highlight;
pub mod interp;
pub mod math;
pub mod phosphor;
pub mod preprocess;
pub mod segment;
pub mod settings;
pub mod trigger;
pub mod viewport;

// Re-export main types at crate root
pub use beam::{BeamState, TracePoint};
pub use highlight::{DIRECTION_VISIBILITY_FLOOR, Highlight, direction_changes};
pub use interp::{catmull_rom, interpolate_trajectory};
pub use math::{Point, flush_denormal, lerp};
pub use phosphor::{
    BEAM_SPOT_SIZE, REFERENCE_VELOCITY, SATURATION_K, SATURATION_KNEE, SATURATION_STRENGTH,
    excitation,
};
pub use preprocess::{ChannelPass, FramePlan, Preprocessor};
pub use segment::{Segment, segment_trajectory};
pub use settings::{DisplayMode, ScopeSettings, TriggerChannel};
pub use trigger::find_rising_edge;
pub use viewport::{HORIZONTAL_DIVISIONS, Viewport};
