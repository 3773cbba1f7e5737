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

//! The engine's backend-agnostic window and input event model.
//!
//! Each event type is the fixed payload of exactly one signal channel; the
//! five channels a window controller publishes on are grouped in
//! [`InitSignals`].

use crate::signal::Signal;
use serde::{Deserialize, Serialize};

/// Press state of a key or mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PressState {
    /// The key or button went down.
    Pressed,
    /// The key or button was released.
    Released,
}

/// Window geometry changed: published for both resizes and moves, always
/// carrying the full current geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeEvent {
    /// New client-area width in pixels.
    pub width: u32,
    /// New client-area height in pixels.
    pub height: u32,
    /// Window x position.
    pub x: i32,
    /// Window y position.
    pub y: i32,
}

/// Platform-independent identifiers for non-character keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum KeyCode {
    Escape,
    Enter,
    Backspace,
    Tab,
    Delete,
    Insert,
    Home,
    End,
    PageUp,
    PageDown,
    Left,
    Right,
    Up,
    Down,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    LeftShift,
    RightShift,
    LeftControl,
    RightControl,
    LeftAlt,
    RightAlt,
    CapsLock,
    NumLock,
    ScrollLock,
    Pause,
    PrintScreen,
    /// A key the keymap recognized but this model has no name for.
    Unknown,
}

/// The logical identity of a pressed key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// A printable character, delivered through text input.
    Char(char),
    /// A function or control key, resolved by the keymap collaborator.
    Code(KeyCode),
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    /// The logical key.
    pub key: Key,
    /// Press or release.
    pub state: PressState,
}

/// Logical mouse button identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    /// The left button.
    Left,
    /// The middle button.
    Middle,
    /// The right button.
    Right,
    /// The first extended (side) button.
    Extra1,
    /// The second extended (side) button.
    Extra2,
    /// An extended button this model has no name for.
    Unknown,
}

/// Direction of a wheel step. The sign convention is fixed: a non-negative
/// native delta is `Up`, a negative delta is `Down`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WheelDirection {
    /// Scrolled away from the user.
    Up,
    /// Scrolled towards the user.
    Down,
}

/// What the pointer did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseAction {
    /// The cursor moved to the event's position.
    Moved,
    /// A button changed state.
    Button {
        /// Which button.
        button: MouseButton,
        /// Press or release.
        state: PressState,
    },
    /// One wheel step.
    Wheel(WheelDirection),
}

/// A pointer event, carrying the cursor position in window coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MouseEvent {
    /// Cursor x position.
    pub x: i32,
    /// Cursor y position.
    pub y: i32,
    /// What happened.
    pub action: MouseAction,
}

/// Window focus changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusEvent {
    /// Whether the window now has input focus.
    pub has_focus: bool,
}

/// The user asked the window to close. The window is *not* destroyed until
/// the application requests it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WindowCloseEvent;

/// The five signal channels a window event controller publishes on.
///
/// Channels exist for the lifetime of the owning controller; subscribers
/// attach and detach dynamically. Dispatch within a channel is ordered by
/// connection; there is no cross-channel ordering guarantee.
#[derive(Debug, Default)]
pub struct InitSignals {
    /// Close requests (user clicked the close button, Alt-F4, ...).
    pub window_close: Signal<WindowCloseEvent>,
    /// Geometry changes (resize and move).
    pub resize: Signal<ResizeEvent>,
    /// Keyboard input, both function keys and printable characters.
    pub key: Signal<KeyEvent>,
    /// Pointer motion, buttons, and wheel.
    pub mouse: Signal<MouseEvent>,
    /// Focus gained/lost.
    pub focus: Signal<FocusEvent>,
}

impl InitSignals {
    /// Creates the channel set with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Disconnects every subscriber on every channel.
    ///
    /// The controller calls this at its own teardown so no dispatch can
    /// reach receivers that outlived their interest.
    pub fn disconnect_all(&self) {
        self.window_close.disconnect_all();
        self.resize.disconnect_all();
        self.key.disconnect_all();
        self.mouse.disconnect_all();
        self.focus.disconnect_all();
    }
}
