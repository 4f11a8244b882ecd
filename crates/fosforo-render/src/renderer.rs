//! Pluggable renderer backend abstraction.
//!
//! The compositor draws through the [`Renderer`] trait and never learns
//! which backend is active. The trait is object-safe on purpose: the worker
//! selects a backend at runtime from a host message, and a boxed trait
//! object keeps backend-specific types out of the pipeline crate.
//!
//! The software backend is authoritative. The GPU backend must produce
//! visually indistinguishable output; antialiasing differences of at most
//! one pixel are the permitted deviation.

use fosforo_core::Point;
use tracing::warn;

use crate::color::Color;
use crate::framebuffer::Framebuffer;
use crate::gpu::GpuRenderer;
use crate::software::SoftwareRenderer;

/// Which renderer backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RendererKind {
    /// CPU rasterizer (always available, authoritative).
    #[default]
    Software,
    /// wgpu offscreen backend.
    Gpu,
}

impl RendererKind {
    /// Stable lowercase name for host messages and config files.
    pub fn as_str(self) -> &'static str {
        match self {
            RendererKind::Software => "software",
            RendererKind::Gpu => "gpu",
        }
    }

    /// Parse a backend name; `None` for unknown names.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "software" => Some(RendererKind::Software),
            "gpu" => Some(RendererKind::Gpu),
            _ => None,
        }
    }
}

/// Drawing operations the compositor needs, in frame order.
///
/// A frame is: one [`clear_with_persistence`] fade, any number of
/// [`stroke_polyline`] and [`fill_dot`] calls, then [`finish_frame`], which
/// makes the result observable in the backend's [`Framebuffer`].
///
/// [`clear_with_persistence`]: Renderer::clear_with_persistence
/// [`stroke_polyline`]: Renderer::stroke_polyline
/// [`fill_dot`]: Renderer::fill_dot
/// [`finish_frame`]: Renderer::finish_frame
pub trait Renderer: Send {
    /// Which backend this is.
    fn kind(&self) -> RendererKind;

    /// Reset the screen to the opaque background color.
    fn clear(&mut self);

    /// Blend the background over the whole screen at `alpha`, decaying
    /// previous content by `1 - alpha`.
    fn clear_with_persistence(&mut self, alpha: f32);

    /// Stroke a polyline with round caps and joins.
    ///
    /// One stroke composites once: overlapping spans within the same
    /// polyline must not double-blend.
    fn stroke_polyline(&mut self, points: &[Point], color: Color, opacity: f32, width: f32);

    /// Fill an antialiased dot.
    fn fill_dot(&mut self, center: Point, radius: f32, color: Color, opacity: f32);

    /// Draw the frames-per-second readout in the top-left corner.
    fn draw_fps(&mut self, fps: u32);

    /// Finish the frame and expose the framebuffer.
    ///
    /// For the software backend this is free; the GPU backend flushes its
    /// batched geometry and reads the target texture back.
    fn finish_frame(&mut self) -> &Framebuffer;
}

/// Probe which backends can be constructed on this machine.
///
/// Software is always present; the GPU entry appears only when an adapter
/// and device can actually be acquired.
pub fn available_renderers(width: u32, height: u32) -> Vec<RendererKind> {
    let mut kinds = vec![RendererKind::Software];
    match GpuRenderer::new(width, height) {
        Ok(_) => kinds.push(RendererKind::Gpu),
        Err(err) => warn!(error = %err, "GPU renderer unavailable"),
    }
    kinds
}

/// Create the requested backend, falling back to software when the GPU is
/// unavailable. Returns the backend actually constructed.
pub fn create_renderer(kind: RendererKind, width: u32, height: u32) -> Box<dyn Renderer> {
    match kind {
        RendererKind::Software => Box::new(SoftwareRenderer::new(width, height)),
        RendererKind::Gpu => match GpuRenderer::new(width, height) {
            Ok(gpu) => Box::new(gpu),
            Err(err) => {
                warn!(error = %err, "falling back to software renderer");
                Box::new(SoftwareRenderer::new(width, height))
            }
        },
    }
}
