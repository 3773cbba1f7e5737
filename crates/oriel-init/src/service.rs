// Copyright 2025 the Oriel project developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The control-thread facade over the event-thread lifecycle.

use crate::config::WindowSettings;
use crate::controller::WindowEventController;
use crate::error::InitError;
use crate::lifecycle::{LifecycleShared, LoopState};
use oriel_core::platform::{Keymap, MessageSource, WindowFactory};
use oriel_core::{InitSignals, SharedGeometry, WindowGeometry};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

struct Collaborators {
    factory: Box<dyn WindowFactory>,
    source: Box<dyn MessageSource>,
    keymap: Box<dyn Keymap>,
}

/// The API surface application code and the renderer use to run the window.
///
/// All methods are meant to be called from the control thread. The service
/// spawns the event thread at window creation, synchronizes with it through
/// the lifecycle gates, and joins it at shutdown.
pub struct WindowService {
    settings: WindowSettings,
    shared: Arc<LifecycleShared>,
    signals: Arc<InitSignals>,
    geometry: Arc<SharedGeometry>,
    collaborators: Option<Collaborators>,
    thread: Option<JoinHandle<()>>,
}

impl WindowService {
    /// Builds a service around the three platform collaborators. Nothing
    /// happens until [`WindowService::create_window`].
    pub fn new(
        settings: WindowSettings,
        factory: Box<dyn WindowFactory>,
        source: Box<dyn MessageSource>,
        keymap: Box<dyn Keymap>,
    ) -> Self {
        let geometry = Arc::new(SharedGeometry::new(settings.geometry()));
        Self {
            settings,
            shared: Arc::new(LifecycleShared::new()),
            signals: Arc::new(InitSignals::new()),
            geometry,
            collaborators: Some(Collaborators {
                factory,
                source,
                keymap,
            }),
            thread: None,
        }
    }

    /// Spawns the event thread and blocks until it reports the window
    /// creation outcome. Callable once per service.
    pub fn create_window(&mut self) -> Result<(), InitError> {
        let collaborators = self.collaborators.take().ok_or(InitError::AlreadyCreated)?;

        let controller = WindowEventController::new(
            Arc::clone(&self.shared),
            Arc::clone(&self.signals),
            Arc::clone(&self.geometry),
            collaborators.factory,
            collaborators.source,
            collaborators.keymap,
            self.settings.geometry(),
        );

        let handle = thread::Builder::new()
            .name("oriel-event".to_string())
            .spawn(move || controller.run())
            .map_err(|e| InitError::ThreadSpawn {
                reason: e.to_string(),
            })?;
        self.thread = Some(handle);

        log::info!(
            "Requesting window '{}' ({}x{})",
            self.settings.title,
            self.settings.width,
            self.settings.height
        );
        self.shared.wait_creation().map_err(InitError::WindowCreation)
    }

    /// Lets the event thread enter its pump loop.
    pub fn start_event_loop(&self) -> Result<(), InitError> {
        if self.thread.is_none() {
            return Err(InitError::NotCreated);
        }
        self.shared.request_start();
        Ok(())
    }

    /// Asks the pump loop to park. With `wait`, blocks until the event
    /// thread is actually parked on the pause gate.
    pub fn pause_event_loop(&self, wait: bool) {
        self.shared.request_pause();
        if wait {
            self.shared.wait_paused();
        }
    }

    /// Lets a paused pump loop continue.
    pub fn resume_event_loop(&self) {
        self.shared.request_resume();
    }

    /// Cooperatively stops the pump loop and blocks until "loop finished"
    /// is observed. The controller stays reusable: a later
    /// [`WindowService::start_event_loop`] re-enters the pump loop.
    ///
    /// There is no timeout here; see
    /// [`WindowService::stop_event_loop_timeout`] for a bounded wait.
    pub fn stop_event_loop(&self) {
        self.shared.request_stop();
        self.shared.wait_loop_finished();
    }

    /// Like [`WindowService::stop_event_loop`] with a bounded wait.
    /// Returns `false` if the loop did not report finishing in time.
    pub fn stop_event_loop_timeout(&self, timeout: Duration) -> bool {
        self.shared.request_stop();
        self.shared.wait_loop_finished_timeout(timeout)
    }

    /// Requests destruction of the native window. The pump is started (and
    /// resumed) if necessary so the platform's destroy acknowledgements can
    /// be drained; teardown is complete only once both have been observed.
    ///
    /// With `wait`, blocks until the event thread has fully torn down.
    pub fn close_window(&self, wait: bool) {
        if self.thread.is_none() {
            return;
        }
        self.shared.request_destroy();
        if wait {
            self.shared.wait_thread_done();
        }
    }

    /// Destroys the window if still alive, joins the event thread, and
    /// disconnects every signal subscriber.
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.thread.take() {
            self.shared.request_destroy();
            if handle.join().is_err() {
                log::error!("The event thread panicked during shutdown");
            }
        }
        // Eager disconnect so no dispatch can reach receivers after the
        // controller is gone.
        self.signals.disconnect_all();
    }

    /// The signal channels the controller publishes on.
    pub fn signals(&self) -> &InitSignals {
        &self.signals
    }

    /// Current window geometry as last published by the event thread.
    pub fn geometry(&self) -> WindowGeometry {
        self.geometry.load()
    }

    /// The shared geometry record itself, for readers that poll every
    /// frame.
    pub fn geometry_record(&self) -> Arc<SharedGeometry> {
        Arc::clone(&self.geometry)
    }

    /// Observable state of the event thread.
    pub fn loop_state(&self) -> LoopState {
        self.shared.loop_state()
    }

    /// Whether the pump loop is currently active (running or paused).
    pub fn is_loop_running(&self) -> bool {
        matches!(self.loop_state(), LoopState::Running | LoopState::Paused)
    }

    /// The shared lifecycle handle, for callers that need finer-grained
    /// waits than the facade methods expose.
    pub fn lifecycle(&self) -> Arc<LifecycleShared> {
        Arc::clone(&self.shared)
    }
}

impl Drop for WindowService {
    fn drop(&mut self) {
        self.shutdown();
    }
}
