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

//! Synchronization state shared between the control and event threads.
//!
//! Each concern gets its own mutex/condvar pair so unrelated transitions
//! never serialize on a single global lock:
//!
//! * the **creation gate** carries the one-time window-creation handoff;
//! * the **run gate** carries the "continue" flag the pump loop waits on
//!   before each run, plus the destroy request;
//! * the **pause gate** carries the pause request and the "is actually
//!   paused" acknowledgement;
//! * the **stop gate** carries "loop finished" (true only when no pump is
//!   active) and the terminal "thread done" flag;
//! * the **destroy acks** record the client-area and non-client
//!   acknowledgements, written only from the event thread.

use oriel_core::platform::PlatformError;
use std::sync::{Condvar, Mutex};
use std::time::Duration;

/// Observable state of the event thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Thread not started yet.
    Uninitialized,
    /// The event thread is creating the native window/context.
    CreatingContext,
    /// Created; parked until the control thread signals "continue".
    WaitingForStart,
    /// The pump loop is draining and dispatching messages.
    Running,
    /// The pump loop is blocked on the pause gate.
    Paused,
    /// The pump loop is winding down towards a stopped notification.
    Stopping,
    /// Terminal: the window is gone and the thread has drained and exited.
    Destroyed,
}

/// Result of the one-time window-creation handoff.
#[derive(Debug)]
enum CreationState {
    Pending,
    Done(Result<(), PlatformError>),
}

#[derive(Debug, Default)]
struct RunState {
    should_run: bool,
    destroy_requested: bool,
}

#[derive(Debug, Default)]
struct PauseState {
    requested: bool,
    is_paused: bool,
}

#[derive(Debug)]
struct StopState {
    loop_finished: bool,
    thread_done: bool,
}

#[derive(Debug, Default)]
struct DestroyAcks {
    client: bool,
    non_client: bool,
}

struct Gate<S> {
    state: Mutex<S>,
    cond: Condvar,
}

impl<S> Gate<S> {
    fn new(state: S) -> Self {
        Self {
            state: Mutex::new(state),
            cond: Condvar::new(),
        }
    }
}

/// The shared lifecycle handle, one per controller.
pub struct LifecycleShared {
    state: Mutex<LoopState>,
    creation: Gate<CreationState>,
    run: Gate<RunState>,
    pause: Gate<PauseState>,
    stop: Gate<StopState>,
    acks: Mutex<DestroyAcks>,
}

impl Default for LifecycleShared {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleShared {
    /// Fresh lifecycle state: nothing created, no pump active.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LoopState::Uninitialized),
            creation: Gate::new(CreationState::Pending),
            run: Gate::new(RunState::default()),
            pause: Gate::new(PauseState::default()),
            // `loop_finished` starts true: no pump is active before the
            // first start.
            stop: Gate::new(StopState {
                loop_finished: true,
                thread_done: false,
            }),
            acks: Mutex::new(DestroyAcks::default()),
        }
    }

    /// Current observable state.
    pub fn loop_state(&self) -> LoopState {
        *self.state.lock().unwrap()
    }

    pub(crate) fn set_state(&self, state: LoopState) {
        let mut current = self.state.lock().unwrap();
        if *current != state {
            log::trace!("Event thread state: {:?} -> {:?}", *current, state);
            *current = state;
        }
    }

    // --- creation gate -----------------------------------------------------

    /// Event thread: publishes the window-creation result, exactly once.
    pub(crate) fn publish_creation(&self, result: Result<(), PlatformError>) {
        let mut state = self.creation.state.lock().unwrap();
        *state = CreationState::Done(result);
        self.creation.cond.notify_all();
    }

    /// Control thread: blocks until the event thread reports the creation
    /// outcome. Window creation happens-before this returns.
    pub(crate) fn wait_creation(&self) -> Result<(), PlatformError> {
        let mut state = self.creation.state.lock().unwrap();
        loop {
            match &*state {
                CreationState::Done(result) => return result.clone(),
                CreationState::Pending => {
                    state = self.creation.cond.wait(state).unwrap();
                }
            }
        }
    }

    // --- run gate ----------------------------------------------------------

    /// Control thread: lets the pump loop (re-)enter `Running`.
    pub fn request_start(&self) {
        let mut run = self.run.state.lock().unwrap();
        run.should_run = true;
        self.run.cond.notify_all();
    }

    /// Control thread: asks the pump loop to finish its current batch and
    /// stop. A paused loop is resumed so it can observe the request.
    pub fn request_stop(&self) {
        {
            let mut run = self.run.state.lock().unwrap();
            run.should_run = false;
            self.run.cond.notify_all();
        }
        let mut pause = self.pause.state.lock().unwrap();
        pause.requested = false;
        self.pause.cond.notify_all();
    }

    /// Control thread: asks the event thread to destroy the window. The
    /// pump is started (and un-paused) so the destroy acknowledgements can
    /// be drained.
    pub fn request_destroy(&self) {
        {
            let mut run = self.run.state.lock().unwrap();
            run.destroy_requested = true;
            run.should_run = true;
            self.run.cond.notify_all();
        }
        let mut pause = self.pause.state.lock().unwrap();
        pause.requested = false;
        self.pause.cond.notify_all();
    }

    /// Event thread: parks until the control thread signals "continue".
    pub(crate) fn wait_for_start(&self) {
        let mut run = self.run.state.lock().unwrap();
        while !run.should_run {
            run = self.run.cond.wait(run).unwrap();
        }
    }

    pub(crate) fn should_run(&self) -> bool {
        self.run.state.lock().unwrap().should_run
    }

    /// Event thread: consumes a pending destroy request.
    pub(crate) fn take_destroy_request(&self) -> bool {
        let mut run = self.run.state.lock().unwrap();
        std::mem::take(&mut run.destroy_requested)
    }

    // --- pause gate --------------------------------------------------------

    /// Control thread: asks the pump loop to block after its current batch.
    pub fn request_pause(&self) {
        let mut pause = self.pause.state.lock().unwrap();
        pause.requested = true;
        self.pause.cond.notify_all();
    }

    /// Control thread: lets a paused pump loop continue.
    pub fn request_resume(&self) {
        let mut pause = self.pause.state.lock().unwrap();
        pause.requested = false;
        self.pause.cond.notify_all();
    }

    /// Control thread: blocks until the pump loop is actually parked on the
    /// pause gate. Only meaningful while the loop is running.
    pub fn wait_paused(&self) {
        let mut pause = self.pause.state.lock().unwrap();
        while pause.requested && !pause.is_paused {
            pause = self.pause.cond.wait(pause).unwrap();
        }
    }

    /// Event thread: blocks here while a pause is requested, marking
    /// `is_paused` for the duration.
    pub(crate) fn pause_point(&self) {
        let mut pause = self.pause.state.lock().unwrap();
        if !pause.requested {
            return;
        }
        pause.is_paused = true;
        self.pause.cond.notify_all();
        self.set_state(LoopState::Paused);
        log::info!("Event loop paused");
        while pause.requested {
            pause = self.pause.cond.wait(pause).unwrap();
        }
        pause.is_paused = false;
        self.pause.cond.notify_all();
        self.set_state(LoopState::Running);
        log::info!("Event loop resumed");
    }

    // --- stop gate ---------------------------------------------------------

    /// Event thread: marks the pump as active. Pairs with
    /// [`LifecycleShared::mark_loop_finished`].
    pub(crate) fn clear_loop_finished(&self) {
        self.stop.state.lock().unwrap().loop_finished = false;
    }

    /// Event thread: no pump is active any more; wake stop waiters.
    pub(crate) fn mark_loop_finished(&self) {
        let mut stop = self.stop.state.lock().unwrap();
        stop.loop_finished = true;
        self.stop.cond.notify_all();
    }

    /// Event thread: terminal. The thread function is about to return.
    pub(crate) fn mark_thread_done(&self) {
        self.set_state(LoopState::Destroyed);
        let mut stop = self.stop.state.lock().unwrap();
        stop.loop_finished = true;
        stop.thread_done = true;
        self.stop.cond.notify_all();
    }

    /// Control thread: blocks until no pump is active.
    pub fn wait_loop_finished(&self) {
        let mut stop = self.stop.state.lock().unwrap();
        while !stop.loop_finished {
            stop = self.stop.cond.wait(stop).unwrap();
        }
    }

    /// Bounded [`LifecycleShared::wait_loop_finished`]; `false` on timeout.
    pub fn wait_loop_finished_timeout(&self, timeout: Duration) -> bool {
        let stop = self.stop.state.lock().unwrap();
        let (stop, result) = self
            .stop
            .cond
            .wait_timeout_while(stop, timeout, |s| !s.loop_finished)
            .unwrap();
        drop(stop);
        !result.timed_out()
    }

    /// Control thread: blocks until the event thread has fully torn down.
    pub fn wait_thread_done(&self) {
        let mut stop = self.stop.state.lock().unwrap();
        while !stop.thread_done {
            stop = self.stop.cond.wait(stop).unwrap();
        }
    }

    /// Bounded [`LifecycleShared::wait_thread_done`]; `false` on timeout.
    pub fn wait_thread_done_timeout(&self, timeout: Duration) -> bool {
        let stop = self.stop.state.lock().unwrap();
        let (stop, result) = self
            .stop
            .cond
            .wait_timeout_while(stop, timeout, |s| !s.thread_done)
            .unwrap();
        drop(stop);
        !result.timed_out()
    }

    // --- destroy acknowledgements ------------------------------------------

    pub(crate) fn ack_client_destroy(&self) {
        self.acks.lock().unwrap().client = true;
    }

    pub(crate) fn ack_non_client_destroy(&self) {
        self.acks.lock().unwrap().non_client = true;
    }

    /// Both the client-area and non-client acknowledgements were observed.
    pub fn destroy_acked(&self) -> bool {
        let acks = self.acks.lock().unwrap();
        acks.client && acks.non_client
    }
}
