//! The render worker loop.
//!
//! Owns the renderer (and through it the framebuffer), the beam physics
//! state, and the pre-processor. Commands arrive in FIFO order and each
//! runs to completion before the next is read, so physics mutation is
//! serialized by construction; there is no lock anywhere in the pipeline.

use std::time::Instant;

use crossbeam_channel::{Receiver, Sender};
use fosforo_core::{BeamState, DisplayMode, Preprocessor, Viewport};
use fosforo_render::{Renderer, RendererKind, available_renderers, create_renderer};
use tracing::{debug, info, warn};

use crate::compose::render_frame;
use crate::messages::{FrameReady, HostCommand, InitInfo, WorkerEvent};

/// Worker-resident state.
struct Worker {
    renderer: Option<Box<dyn Renderer>>,
    beam: BeamState,
    pre: Preprocessor,
    viewport: Viewport,
    /// Mode of the previous frame; a change resets the beam.
    last_mode: Option<DisplayMode>,
    /// True once a frame has been rendered; an in-place renderer switch is
    /// only possible before that.
    surface_consumed: bool,
    frame_no: u64,
}

/// Run the worker loop until `Shutdown` or until the host drops its sender.
///
/// This is the thread body spawned by [`ScopeHost`](crate::host::ScopeHost);
/// it is public so alternative hosts (tests, embedders with their own
/// threading) can drive it directly.
pub fn run(commands: Receiver<HostCommand>, events: Sender<WorkerEvent>) {
    let mut worker = Worker {
        renderer: None,
        beam: BeamState::new(),
        pre: Preprocessor::new(),
        viewport: Viewport::new(600.0, 600.0),
        last_mode: None,
        surface_consumed: false,
        frame_no: 0,
    };

    while let Ok(command) = commands.recv() {
        match command {
            HostCommand::Init {
                logical_width,
                logical_height,
                device_pixel_ratio,
                renderer,
            } => {
                worker.viewport = Viewport::with_pixel_ratio(
                    logical_width as f32,
                    logical_height as f32,
                    device_pixel_ratio,
                );
                let width = worker.viewport.width as u32;
                let height = worker.viewport.height as u32;
                let available = available_renderers(width, height);
                let backend = create_renderer(renderer, width, height);
                let active = backend.kind();
                worker.renderer = Some(backend);
                info!(
                    requested = renderer.as_str(),
                    active = active.as_str(),
                    width,
                    height,
                    "renderer initialized"
                );
                if events
                    .send(WorkerEvent::Initialized(InitInfo { available, active }))
                    .is_err()
                {
                    return;
                }
            }

            HostCommand::Render(request) => {
                let Some(renderer) = worker.renderer.as_deref_mut() else {
                    warn!("render before init, dropping frame");
                    continue;
                };
                let started = Instant::now();
                let settings = request.settings.sanitized();

                // A mode change is the one non-explicit beam reset.
                if worker.last_mode.is_some_and(|m| m != settings.mode) {
                    worker.beam.reset();
                }
                worker.last_mode = Some(settings.mode);

                let mut stats = render_frame(
                    renderer,
                    &mut worker.beam,
                    &mut worker.pre,
                    &worker.viewport,
                    &request,
                    &settings,
                );
                let frame = renderer.finish_frame().clone();
                stats.render_ms = started.elapsed().as_secs_f32() * 1000.0;
                worker.surface_consumed = true;
                worker.frame_no += 1;
                debug!(
                    frame = worker.frame_no,
                    ms = stats.render_ms,
                    segments = stats.segments,
                    "frame rendered"
                );
                if events
                    .send(WorkerEvent::Ready(Box::new(FrameReady {
                        frame_no: worker.frame_no,
                        frame,
                        stats,
                    })))
                    .is_err()
                {
                    return;
                }
            }

            HostCommand::SwitchRenderer(kind) => {
                if worker.surface_consumed {
                    info!(
                        requested = kind.as_str(),
                        "surface already consumed, switch needs a rebuild"
                    );
                    if events
                        .send(WorkerEvent::SwitchFailed { requested: kind })
                        .is_err()
                    {
                        return;
                    }
                } else {
                    let width = worker.viewport.width as u32;
                    let height = worker.viewport.height as u32;
                    let backend = create_renderer(kind, width, height);
                    let active = backend.kind();
                    worker.renderer = Some(backend);
                    info!(active = active.as_str(), "renderer switched in place");
                    let available = available_renderers(width, height);
                    if events
                        .send(WorkerEvent::Initialized(InitInfo { available, active }))
                        .is_err()
                    {
                        return;
                    }
                }
            }

            HostCommand::Clear => {
                if let Some(r) = worker.renderer.as_deref_mut() {
                    r.clear();
                }
            }

            HostCommand::Reset => {
                if let Some(r) = worker.renderer.as_deref_mut() {
                    r.clear();
                }
                worker.beam.reset();
                worker.last_mode = None;
            }

            HostCommand::Shutdown => {
                debug!("worker shutting down");
                return;
            }
        }
    }
}
