//! Host/worker message vocabulary.
//!
//! Everything crossing the channel is value-owned: sample buffers move into
//! the `Render` message, settings are copied, and the finished frame comes
//! back as an owned snapshot. Neither side ever shares memory with the
//! other, which is what keeps the worker single-writer.

use fosforo_core::ScopeSettings;
use fosforo_render::{Framebuffer, RendererKind};

use crate::compose::FrameStats;

/// One frame of input: both channels plus capture metadata.
#[derive(Debug, Clone)]
pub struct FrameRequest {
    /// Channel A samples in [-1, 1].
    pub samples_a: Vec<f32>,
    /// Channel B samples, same length as `samples_a`.
    pub samples_b: Vec<f32>,
    /// Capture rate in Hz.
    pub sample_rate: f32,
    /// Control settings for this frame (value copy).
    pub settings: ScopeSettings,
    /// Wall-clock seconds since the previous host tick, for the FPS readout.
    pub dt_wall: f32,
}

/// Commands from host to worker, processed strictly in order.
#[derive(Debug)]
pub enum HostCommand {
    /// Create the renderer; answered by [`WorkerEvent::Initialized`].
    Init {
        /// Logical canvas width in pixels.
        logical_width: u32,
        /// Logical canvas height in pixels.
        logical_height: u32,
        /// Device pixel ratio multiplying the logical size.
        device_pixel_ratio: f32,
        /// Requested backend.
        renderer: RendererKind,
    },
    /// Run the pipeline for one frame; answered by [`WorkerEvent::Ready`].
    Render(Box<FrameRequest>),
    /// Replace the renderer backend.
    ///
    /// Succeeds only while the surface is untouched (before the first
    /// render); afterwards the worker answers
    /// [`WorkerEvent::SwitchFailed`] and the host must rebuild.
    SwitchRenderer(RendererKind),
    /// Clear the screen, keep physics state.
    Clear,
    /// Clear the screen and reset physics state to the origin.
    Reset,
    /// Exit the worker loop.
    Shutdown,
}

/// What the worker reported alongside a finished frame.
#[derive(Debug, Clone)]
pub struct FrameReady {
    /// Monotonic frame counter.
    pub frame_no: u64,
    /// Snapshot of the presented framebuffer.
    pub frame: Framebuffer,
    /// Render timing and workload numbers.
    pub stats: FrameStats,
}

/// Answer to [`HostCommand::Init`].
#[derive(Debug, Clone)]
pub struct InitInfo {
    /// Backends that can be constructed on this machine.
    pub available: Vec<RendererKind>,
    /// Backend actually running (the fallback may differ from the request).
    pub active: RendererKind,
}

/// Events from worker to host.
#[derive(Debug)]
pub enum WorkerEvent {
    /// Renderer is up; reports the probed backends.
    Initialized(InitInfo),
    /// A render completed and the framebuffer snapshot is attached.
    Ready(Box<FrameReady>),
    /// The renderer switch could not happen in place.
    SwitchFailed {
        /// The backend the host asked for; carried so the host can rebuild
        /// with it preserved.
        requested: RendererKind,
    },
}
