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

//! The typed signal/slot dispatch bus.
//!
//! A [`Signal`] is a one-to-many channel of a fixed payload type. Sending on
//! a signal synchronously invokes every connected [`Slot`] on the caller's
//! thread, in connection order. The bus is generic over the payload type so
//! `oriel-core` stays decoupled from the concrete event types defined on top
//! of it.

use std::fmt;
use std::sync::{Arc, Mutex};

/// A receiver on a [`Signal`]: a cloneable, reference-counted callable.
///
/// Slot identity is the identity of the underlying allocation — clones of a
/// `Slot` are the *same* receiver, while two slots built from identical
/// closures are distinct. A signal rejects connecting the same receiver
/// twice.
pub struct Slot<T> {
    func: Arc<dyn Fn(&T) + Send + Sync>,
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Self {
            func: Arc::clone(&self.func),
        }
    }
}

impl<T> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot").field("key", &self.key()).finish()
    }
}

impl<T> Slot<T> {
    /// Wraps a closure as a slot.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
        }
    }

    /// Identity of the receiver, stable across clones.
    fn key(&self) -> usize {
        Arc::as_ptr(&self.func) as *const () as usize
    }

    fn invoke(&self, payload: &T) {
        (self.func)(payload);
    }
}

impl<T: Clone + Send + Sync + 'static> Slot<T> {
    /// Builds a slot that forwards payload clones into a channel.
    ///
    /// This is the bridge for subscribers living on another thread: connect
    /// the slot on the event thread's signal and receive on the other end.
    /// A disconnected receiver is logged and otherwise ignored.
    pub fn from_sender(sender: flume::Sender<T>) -> Self {
        Self::new(move |payload: &T| {
            if let Err(e) = sender.send(payload.clone()) {
                log::error!("Failed to forward event: {e}. Receiver likely disconnected.");
            }
        })
    }
}

/// A typed one-to-many channel with deterministic, synchronous fan-out.
///
/// Dispatch order is connection order. There is no ordering guarantee across
/// *different* signals. Disconnecting a slot from inside a dispatch on the
/// same signal is safe: the in-progress pass finishes over a snapshot taken
/// when [`Signal::send`] was entered.
pub struct Signal<T> {
    slots: Mutex<Vec<Slot<T>>>,
}

impl<T> Signal<T> {
    /// Creates an empty signal.
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(Vec::new()),
        }
    }

    /// Connects a receiver.
    ///
    /// Returns `false` if this receiver is already connected. Connection
    /// order determines dispatch order.
    pub fn connect(&self, slot: &Slot<T>) -> bool {
        let mut slots = self.slots.lock().unwrap();
        if slots.iter().any(|s| s.key() == slot.key()) {
            return false;
        }
        slots.push(slot.clone());
        true
    }

    /// Disconnects a receiver. Returns `false` if it was not connected.
    pub fn disconnect(&self, slot: &Slot<T>) -> bool {
        let mut slots = self.slots.lock().unwrap();
        let before = slots.len();
        slots.retain(|s| s.key() != slot.key());
        slots.len() != before
    }

    /// Disconnects every receiver. Used at controller teardown.
    pub fn disconnect_all(&self) {
        self.slots.lock().unwrap().clear();
    }

    /// Number of connected receivers.
    pub fn slot_count(&self) -> usize {
        self.slots.lock().unwrap().len()
    }

    /// Invokes every receiver connected at the moment of the call, in
    /// connection order, synchronously on the caller's thread.
    ///
    /// The slot list is snapshotted before the first invocation, so
    /// receivers may connect or disconnect slots on this signal without
    /// affecting the current pass. Panics from a receiver are not caught.
    pub fn send(&self, payload: &T) {
        let snapshot: Vec<Slot<T>> = self.slots.lock().unwrap().clone();
        for slot in &snapshot {
            slot.invoke(payload);
        }
    }
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("slots", &self.slot_count())
            .finish()
    }
}
