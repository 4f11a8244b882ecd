//! Worker-thread frame pipeline for the fosforo scope.
//!
//! The host (UI, audio capture, or the offline CLI) and the render worker
//! are two threads joined by a pair of FIFO channels. The worker owns
//! everything mutable: the renderer, the framebuffer behind it, and the
//! beam physics state. The host owns nothing but channel endpoints, which
//! makes the single-writer rules of the data model true by construction.
//!
//! ## Protocol
//!
//! ```text
//! host                         worker
//!  | --- Init{config} ---------> |  create renderer
//!  | <-- Initialized{backends} - |
//!  | --- Render{frame} --------> |  preprocess, physics, stroke
//!  | <-- Ready{frame, stats} --- |
//!  | --- Render{frame} --------> |  ...
//! ```
//!
//! Only one render is ever outstanding: [`ScopeHost::try_render`] refuses a
//! new frame until the previous `Ready` arrived, so a slow worker drops
//! host ticks (newest-wins) instead of queueing them.
//!
//! ## Module map
//!
//! - [`messages`] - the host/worker message vocabulary
//! - [`compose`] - the per-frame stage composition, the pipeline itself
//! - [`worker`] - the worker loop owning renderer and physics state
//! - [`host`] - the host-side handle with backpressure

pub mod compose;
pub mod host;
pub mod messages;
pub mod worker;

pub use compose::FrameStats;
pub use host::{ScopeHost, SurfaceConfig};
pub use messages::{FrameReady, FrameRequest, HostCommand, InitInfo, WorkerEvent};

/// Errors surfaced by the host-side handle.
///
/// The frame path itself is infallible by policy (worst case is a blank
/// frame); these cover protocol-level failures only.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The worker thread is gone (channel disconnected).
    #[error("render worker disconnected")]
    WorkerGone,

    /// The worker answered an init with something other than Initialized.
    #[error("worker failed to initialize")]
    InitFailed,
}
