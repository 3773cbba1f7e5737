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

//! Contracts for the platform collaborators of the windowing layer.
//!
//! Any windowing backend (Win32, X11, a test harness, ...) plugs in by
//! implementing [`WindowFactory`], [`MessageSource`], and [`Keymap`]. The
//! lifecycle crate never talks to the native platform directly; it pulls
//! [`RawMessage`]s from the source and pushes typed events out through
//! signals.

mod message;

pub use message::{RawButton, RawMessage};

use crate::event::KeyCode;
use crate::geometry::WindowGeometry;
use std::fmt;

/// Opaque identifier of a native window, assigned by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub u64);

/// A live native window/context handle.
///
/// The handle is exclusively owned by the event thread while the pump loop
/// runs; other threads observe the window only through signals and the
/// shared geometry record.
pub trait NativeWindow: Send {
    /// The platform identifier messages are addressed with.
    fn id(&self) -> WindowId;

    /// Geometry the window actually came up with.
    fn geometry(&self) -> WindowGeometry;
}

/// Creates and destroys native windows. Invoked once each per window
/// lifetime, always on the event thread.
pub trait WindowFactory: Send {
    /// Creates the native window/context.
    fn create_window(
        &mut self,
        requested: &WindowGeometry,
    ) -> Result<Box<dyn NativeWindow>, PlatformError>;

    /// Begins destruction of the window.
    ///
    /// Destruction is asynchronous at the platform level: the final
    /// [`RawMessage::DestroyAck`] and [`RawMessage::NcDestroyAck`] arrive
    /// through the message source afterwards.
    fn destroy_window(&mut self, window: Box<dyn NativeWindow>);
}

/// A pull source of pending native messages.
pub trait MessageSource: Send {
    /// Removes and returns the next pending message, non-blocking.
    ///
    /// With `Some(id)` only messages addressed to that window are drained;
    /// with `None` any queued message is returned, which the controller uses
    /// to flush process-wide input during teardown.
    fn poll(&mut self, target: Option<WindowId>) -> Option<(WindowId, RawMessage)>;

    /// Hands a message the engine does not consume back to the platform's
    /// default handler.
    fn dispatch_default(&mut self, window: WindowId, message: &RawMessage);
}

/// Resolves native key codes into the engine's key identifiers.
pub trait Keymap: Send + Sync {
    /// Maps a native key code and press state to a [`KeyCode`].
    ///
    /// `None` means "no mapping — the key is already delivered as text
    /// input", which prevents double delivery of character keys.
    fn resolve(&self, code: u32, pressed: bool) -> Option<KeyCode>;
}

/// Errors raised by platform collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// The native window/context could not be created.
    WindowCreation {
        /// Platform-reported reason.
        reason: String,
    },
    /// The native message queue failed.
    MessageQueue {
        /// Platform-reported reason.
        reason: String,
    },
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::WindowCreation { reason } => {
                write!(f, "Failed to create the native window: {reason}")
            }
            PlatformError::MessageQueue { reason } => {
                write!(f, "Native message queue failure: {reason}")
            }
        }
    }
}

impl std::error::Error for PlatformError {}
