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

//! The native message vocabulary.
//!
//! Field extraction from the platform's raw payloads (packed words, event
//! unions, ...) is the message source's business; the variants here carry
//! already-extracted values. The engine only interprets their meaning — the
//! sign of a wheel delta, the printable-character threshold, the
//! destroy-acknowledgement pair.

/// A raw button identity as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawButton {
    /// Left button.
    Left,
    /// Middle button.
    Middle,
    /// Right button.
    Right,
    /// First extended button.
    X1,
    /// Second extended button.
    X2,
    /// A button outside the known set, with the platform's raw code.
    Other(u16),
}

/// One decoded native message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawMessage {
    /// The client area was resized.
    Resized {
        /// New client-area width.
        width: u32,
        /// New client-area height.
        height: u32,
    },
    /// The window was moved.
    Moved {
        /// New x position.
        x: i32,
        /// New y position.
        y: i32,
    },
    /// The cursor moved inside the window.
    PointerMoved {
        /// Cursor x, window coordinates.
        x: i32,
        /// Cursor y, window coordinates.
        y: i32,
    },
    /// A mouse button changed state.
    PointerButton {
        /// Which button.
        button: RawButton,
        /// Down (`true`) or up (`false`).
        pressed: bool,
    },
    /// One wheel notch. Sign carries the direction.
    Wheel {
        /// Signed wheel delta.
        delta: i16,
    },
    /// A keyboard key changed state, identified by its native code.
    Key {
        /// Native key code, resolved by the keymap collaborator.
        code: u32,
        /// Down (`true`) or up (`false`).
        pressed: bool,
    },
    /// Translated text input, one code point.
    Character {
        /// The code point after modifier translation.
        code: u32,
    },
    /// The user requested the window to close.
    CloseRequested,
    /// Input focus changed.
    FocusChanged {
        /// Whether focus was gained.
        gained: bool,
    },
    /// Client-area destruction acknowledged by the platform.
    DestroyAck,
    /// Non-client destruction acknowledged; the last message a window sees.
    NcDestroyAck,
    /// Any message type the engine does not handle, with its raw type code.
    Other(u32),
}
