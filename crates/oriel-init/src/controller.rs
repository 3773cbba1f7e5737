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

//! The event-thread state machine.
//!
//! [`WindowEventController::run`] is the body of the event thread. It
//! creates the native window exactly once, hands the result back through
//! the creation gate, and then cycles between waiting for a start signal
//! and pumping native messages until the window is destroyed.

use crate::lifecycle::{LifecycleShared, LoopState};
use crate::translate::{translate, Translation};
use oriel_core::platform::{
    Keymap, MessageSource, NativeWindow, RawMessage, WindowFactory, WindowId,
};
use oriel_core::{InitSignals, SharedGeometry, WindowGeometry};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Bounded sleep between drained message batches so an idle pump loop does
/// not saturate a core. Stop and pause requests are observed at this
/// granularity at worst.
pub const IDLE_INTERVAL: Duration = Duration::from_millis(5);

/// Owns the native window and the platform collaborators on the event
/// thread.
pub struct WindowEventController {
    shared: Arc<LifecycleShared>,
    signals: Arc<InitSignals>,
    geometry: Arc<SharedGeometry>,
    factory: Box<dyn WindowFactory>,
    source: Box<dyn MessageSource>,
    keymap: Box<dyn Keymap>,
    requested: WindowGeometry,
    window: Option<Box<dyn NativeWindow>>,
    window_id: Option<WindowId>,
    cursor: (i32, i32),
}

impl WindowEventController {
    pub(crate) fn new(
        shared: Arc<LifecycleShared>,
        signals: Arc<InitSignals>,
        geometry: Arc<SharedGeometry>,
        factory: Box<dyn WindowFactory>,
        source: Box<dyn MessageSource>,
        keymap: Box<dyn Keymap>,
        requested: WindowGeometry,
    ) -> Self {
        Self {
            shared,
            signals,
            geometry,
            factory,
            source,
            keymap,
            requested,
            window: None,
            window_id: None,
            cursor: (0, 0),
        }
    }

    /// The event-thread function. Returns only when the controller has
    /// reached its terminal state.
    pub fn run(mut self) {
        log::info!("Event thread started");
        self.shared.set_state(LoopState::CreatingContext);

        // Window creation happens exactly once per controller, under the
        // creation gate; the control thread's init continues only after the
        // result is published.
        match self.factory.create_window(&self.requested) {
            Ok(window) => {
                self.geometry.store(window.geometry());
                self.window_id = Some(window.id());
                self.window = Some(window);
                self.shared.publish_creation(Ok(()));
            }
            Err(e) => {
                log::error!("Window creation failed on the event thread: {e}");
                self.shared.publish_creation(Err(e));
                self.shared.mark_thread_done();
                return;
            }
        }

        loop {
            self.shared.set_state(LoopState::WaitingForStart);
            log::debug!("Event thread waiting");
            self.shared.wait_for_start();
            log::debug!("Event thread continue");

            if self.window.is_none() {
                break;
            }

            self.shared.clear_loop_finished();
            self.shared.set_state(LoopState::Running);
            log::info!("Event loop started");

            self.pump_loop();

            log::info!("Event loop finished");
            self.shared.set_state(LoopState::Stopping);
            self.shared.mark_loop_finished();
        }

        // Terminal: flush what the platform still has queued, first for the
        // old window, then process-wide.
        self.drain_remaining();
        log::info!("Event thread done");
        self.shared.mark_thread_done();
    }

    /// The pump loop: drain-translate-dispatch until the window is fully
    /// destroyed or the control thread clears the "should run" flag. Stop
    /// is cooperative and observed between batches, never mid-message.
    fn pump_loop(&mut self) {
        while !self.shared.destroy_acked() && self.shared.should_run() {
            self.shared.pause_point();

            if self.shared.take_destroy_request() {
                if let Some(window) = self.window.take() {
                    log::info!("Destroying the native window");
                    self.factory.destroy_window(window);
                }
            }

            while let Some((id, message)) = self.source.poll(self.window_id) {
                self.handle_message(id, message, true);
            }

            thread::sleep(IDLE_INTERVAL);
        }
    }

    /// Final drain after the window is gone: remaining messages addressed
    /// to the old window, then everything still queued process-wide.
    fn drain_remaining(&mut self) {
        if let Some(id) = self.window_id {
            while let Some((msg_id, message)) = self.source.poll(Some(id)) {
                self.handle_message(msg_id, message, true);
            }
        }
        while let Some((msg_id, message)) = self.source.poll(None) {
            self.handle_message(msg_id, message, false);
        }
    }

    /// Translates one message and publishes the resulting event, if any.
    ///
    /// `strict` messages must be addressed to this controller's window; a
    /// mismatch is a platform protocol violation — logged, answered with
    /// the default handler, and otherwise dropped. The loop never aborts
    /// because of a single bad message.
    fn handle_message(&mut self, id: WindowId, message: RawMessage, strict: bool) {
        if Some(id) != self.window_id {
            if strict {
                log::error!(
                    "Native message {message:?} addressed to foreign window {id:?} (own: {:?})",
                    self.window_id
                );
            }
            self.source.dispatch_default(id, &message);
            return;
        }

        match translate(&message, &self.geometry, &mut self.cursor, &*self.keymap) {
            Translation::Resize(event) => self.signals.resize.send(&event),
            Translation::Mouse(event) => self.signals.mouse.send(&event),
            Translation::Key(event) => self.signals.key.send(&event),
            Translation::Focus(event) => self.signals.focus.send(&event),
            Translation::Close(event) => self.signals.window_close.send(&event),
            Translation::ClientDestroyed => {
                log::info!("Window destroyed (client area acknowledgement)");
                self.shared.ack_client_destroy();
            }
            Translation::NonClientDestroyed => {
                log::info!("Window destroyed (non-client acknowledgement)");
                self.shared.ack_non_client_destroy();
            }
            Translation::Unhandled => self.source.dispatch_default(id, &message),
            Translation::Swallowed => {}
        }
    }
}
