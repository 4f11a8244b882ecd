//! Rendering layer for the fosforo scope.
//!
//! This crate owns the persistent framebuffer and the pluggable renderer
//! backends that stroke the phosphor trace onto it:
//!
//! - [`Framebuffer`] - RGBA8 pixel store, single-writer, persists across
//!   frames to carry the phosphor afterglow
//! - [`Renderer`] - object-safe backend trait: persistence fade, polyline
//!   strokes with round caps and joins, filled dots, an FPS readout
//! - [`SoftwareRenderer`] - authoritative CPU rasterizer with coverage-based
//!   antialiasing
//! - [`GpuRenderer`] - wgpu offscreen backend; visually indistinguishable
//!   from software within antialiasing tolerance
//!
//! ## Backend selection
//!
//! The trait uses a boxed object rather than generics so the worker can
//! select a backend at runtime from a host message. [`create_renderer`]
//! probes the requested [`RendererKind`] and falls back to software when the
//! GPU is unavailable, logging a notice; configuration failure is the only
//! error that ever surfaces from this crate's frame path.

mod color;
mod framebuffer;
mod glyphs;
mod gpu;
mod renderer;
mod software;

pub use color::{BACKGROUND, Color, DEBUG_INTERPOLATED, DEBUG_ORIGINAL, P31_GREEN};
pub use framebuffer::Framebuffer;
pub use gpu::GpuRenderer;
pub use renderer::{Renderer, RendererKind, available_renderers, create_renderer};
pub use software::SoftwareRenderer;

/// Error types for renderer construction and GPU readback.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// No suitable GPU adapter was found.
    #[error("no GPU adapter available: {0}")]
    AdapterUnavailable(String),

    /// The adapter refused a device with the required limits.
    #[error("GPU device request failed: {0}")]
    DeviceRequest(String),

    /// Texture-to-buffer readback failed.
    #[error("GPU readback failed: {0}")]
    Readback(String),

    /// Requested framebuffer dimensions are unusable.
    #[error("invalid framebuffer size {width}x{height}")]
    InvalidSize {
        /// Requested width in device pixels.
        width: u32,
        /// Requested height in device pixels.
        height: u32,
    },
}
