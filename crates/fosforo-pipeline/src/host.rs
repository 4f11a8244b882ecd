//! Host-side handle with one-frame-in-flight backpressure.
//!
//! [`ScopeHost`] spawns the worker thread and enforces the cooperative
//! protocol: at most one `Render` outstanding. When the worker has not
//! acknowledged the previous frame by the next host tick, [`try_render`]
//! refuses the new one and the host simply drops it; queue depth stays at
//! one and the display always shows the newest data that fit.
//!
//! [`try_render`]: ScopeHost::try_render

use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender, unbounded};
use fosforo_render::RendererKind;
use tracing::warn;

use crate::PipelineError;
use crate::messages::{FrameReady, FrameRequest, HostCommand, InitInfo, WorkerEvent};
use crate::worker;

/// Canvas geometry and backend selection for worker init.
#[derive(Debug, Clone)]
pub struct SurfaceConfig {
    /// Logical canvas width in pixels.
    pub logical_width: u32,
    /// Logical canvas height in pixels.
    pub logical_height: u32,
    /// Device pixel ratio.
    pub device_pixel_ratio: f32,
    /// Requested renderer backend.
    pub renderer: RendererKind,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            logical_width: 600,
            logical_height: 600,
            device_pixel_ratio: 1.0,
            renderer: RendererKind::Software,
        }
    }
}

/// Handle to a running render worker.
pub struct ScopeHost {
    commands: Sender<HostCommand>,
    events: Receiver<WorkerEvent>,
    thread: Option<JoinHandle<()>>,
    in_flight: bool,
    switch_failure: Option<RendererKind>,
}

impl ScopeHost {
    /// Spawn the worker, initialize its renderer, and wait for the
    /// `Initialized` answer.
    pub fn spawn(config: SurfaceConfig) -> Result<(Self, InitInfo), PipelineError> {
        let (cmd_tx, cmd_rx) = unbounded();
        let (evt_tx, evt_rx) = unbounded();

        let thread = std::thread::Builder::new()
            .name("fosforo-render".into())
            .spawn(move || worker::run(cmd_rx, evt_tx))
            .map_err(|_| PipelineError::InitFailed)?;

        let host = Self {
            commands: cmd_tx,
            events: evt_rx,
            thread: Some(thread),
            in_flight: false,
            switch_failure: None,
        };

        host.commands
            .send(HostCommand::Init {
                logical_width: config.logical_width,
                logical_height: config.logical_height,
                device_pixel_ratio: config.device_pixel_ratio,
                renderer: config.renderer,
            })
            .map_err(|_| PipelineError::WorkerGone)?;

        match host.events.recv() {
            Ok(WorkerEvent::Initialized(info)) => Ok((host, info)),
            Ok(_) => Err(PipelineError::InitFailed),
            Err(_) => Err(PipelineError::WorkerGone),
        }
    }

    /// Submit a frame unless one is already in flight.
    ///
    /// Returns `Ok(true)` when the frame was dispatched and `Ok(false)`
    /// when it was dropped by backpressure (the previous `Ready` has not
    /// arrived). Dropped frames are silent by design; there is no replay.
    pub fn try_render(&mut self, request: FrameRequest) -> Result<bool, PipelineError> {
        if self.in_flight {
            return Ok(false);
        }
        self.commands
            .send(HostCommand::Render(Box::new(request)))
            .map_err(|_| PipelineError::WorkerGone)?;
        self.in_flight = true;
        Ok(true)
    }

    /// Non-blocking poll for worker events.
    ///
    /// Returns the newest finished frame, if any. `SwitchFailed` events are
    /// surfaced through [`take_switch_failure`](Self::take_switch_failure).
    pub fn poll_ready(&mut self) -> Option<FrameReady> {
        let mut newest = None;
        while let Ok(event) = self.events.try_recv() {
            if let Some(ready) = self.absorb(event) {
                newest = Some(ready);
            }
        }
        newest
    }

    /// Block until the in-flight frame completes.
    ///
    /// The offline host (CLI) uses this; an interactive host should prefer
    /// [`poll_ready`](Self::poll_ready).
    pub fn wait_ready(&mut self) -> Result<FrameReady, PipelineError> {
        if !self.in_flight {
            return Err(PipelineError::InitFailed);
        }
        loop {
            let event = self.events.recv().map_err(|_| PipelineError::WorkerGone)?;
            if let Some(ready) = self.absorb(event) {
                return Ok(ready);
            }
        }
    }

    fn absorb(&mut self, event: WorkerEvent) -> Option<FrameReady> {
        match event {
            WorkerEvent::Ready(ready) => {
                self.in_flight = false;
                Some(*ready)
            }
            WorkerEvent::SwitchFailed { requested } => {
                warn!(
                    requested = requested.as_str(),
                    "renderer switch needs surface rebuild"
                );
                self.switch_failure = Some(requested);
                None
            }
            WorkerEvent::Initialized(_) => None,
        }
    }

    /// Ask the worker to switch backends in place.
    ///
    /// After the first rendered frame this will fail; the failure arrives
    /// as an event and is readable via
    /// [`take_switch_failure`](Self::take_switch_failure). The host then
    /// rebuilds: drop this handle and spawn a new one with the requested
    /// kind (persisting the choice is the config crate's job).
    pub fn switch_renderer(&mut self, kind: RendererKind) -> Result<(), PipelineError> {
        self.commands
            .send(HostCommand::SwitchRenderer(kind))
            .map_err(|_| PipelineError::WorkerGone)
    }

    /// The backend kind of the most recent failed switch, if one happened.
    pub fn take_switch_failure(&mut self) -> Option<RendererKind> {
        self.switch_failure.take()
    }

    /// Clear the screen, keeping beam state.
    pub fn clear(&self) -> Result<(), PipelineError> {
        self.commands
            .send(HostCommand::Clear)
            .map_err(|_| PipelineError::WorkerGone)
    }

    /// Clear the screen and reset beam state to the origin.
    pub fn reset(&self) -> Result<(), PipelineError> {
        self.commands
            .send(HostCommand::Reset)
            .map_err(|_| PipelineError::WorkerGone)
    }

    /// True while a render is outstanding.
    pub fn frame_in_flight(&self) -> bool {
        self.in_flight
    }
}

impl Drop for ScopeHost {
    fn drop(&mut self) {
        let _ = self.commands.send(HostCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
