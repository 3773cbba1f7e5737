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

//! Translation from native messages to the engine's typed events.
//!
//! Each [`RawMessage`] maps to at most one published event. Geometry
//! messages additionally update the shared geometry record; pointer
//! messages track the cursor position so button and wheel events carry it.

use oriel_core::event::{
    FocusEvent, Key, KeyEvent, MouseAction, MouseButton, MouseEvent, PressState, ResizeEvent,
    WheelDirection, WindowCloseEvent,
};
use oriel_core::platform::{Keymap, RawButton, RawMessage};
use oriel_core::SharedGeometry;

/// Control characters and space are excluded from text input; anything
/// above this threshold is a printable character.
const FIRST_PRINTABLE: u32 = 32;

/// Outcome of translating one native message.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Translation {
    /// Publish on the resize channel.
    Resize(ResizeEvent),
    /// Publish on the mouse channel.
    Mouse(MouseEvent),
    /// Publish on the key channel.
    Key(KeyEvent),
    /// Publish on the focus channel.
    Focus(FocusEvent),
    /// Publish on the window-close channel.
    Close(WindowCloseEvent),
    /// Client-area destruction acknowledged; no signal.
    ClientDestroyed,
    /// Non-client destruction acknowledged; no signal.
    NonClientDestroyed,
    /// Not consumed by the engine; hand to the platform's default handler.
    Unhandled,
    /// Consumed without producing a signal (control character, key already
    /// delivered as text, zero-information message).
    Swallowed,
}

fn press_state(pressed: bool) -> PressState {
    if pressed {
        PressState::Pressed
    } else {
        PressState::Released
    }
}

fn map_button(button: RawButton) -> MouseButton {
    match button {
        RawButton::Left => MouseButton::Left,
        RawButton::Middle => MouseButton::Middle,
        RawButton::Right => MouseButton::Right,
        RawButton::X1 => MouseButton::Extra1,
        RawButton::X2 => MouseButton::Extra2,
        RawButton::Other(code) => {
            log::info!("Found unhandled extended mouse button ({code})");
            MouseButton::Unknown
        }
    }
}

/// Translates one message.
///
/// `cursor` is the event thread's record of the last pointer position;
/// button and wheel messages do not carry coordinates of their own.
pub(crate) fn translate(
    message: &RawMessage,
    geometry: &SharedGeometry,
    cursor: &mut (i32, i32),
    keymap: &dyn Keymap,
) -> Translation {
    match *message {
        RawMessage::Resized { width, height } => {
            let mut g = geometry.load();
            g.width = width;
            g.height = height;
            geometry.store(g);
            Translation::Resize(ResizeEvent {
                width: g.width,
                height: g.height,
                x: g.x,
                y: g.y,
            })
        }
        RawMessage::Moved { x, y } => {
            let mut g = geometry.load();
            g.x = x;
            g.y = y;
            geometry.store(g);
            Translation::Resize(ResizeEvent {
                width: g.width,
                height: g.height,
                x: g.x,
                y: g.y,
            })
        }
        RawMessage::PointerMoved { x, y } => {
            *cursor = (x, y);
            Translation::Mouse(MouseEvent {
                x,
                y,
                action: MouseAction::Moved,
            })
        }
        RawMessage::PointerButton { button, pressed } => Translation::Mouse(MouseEvent {
            x: cursor.0,
            y: cursor.1,
            action: MouseAction::Button {
                button: map_button(button),
                state: press_state(pressed),
            },
        }),
        RawMessage::Wheel { delta } => {
            let direction = if delta >= 0 {
                WheelDirection::Up
            } else {
                WheelDirection::Down
            };
            Translation::Mouse(MouseEvent {
                x: cursor.0,
                y: cursor.1,
                action: MouseAction::Wheel(direction),
            })
        }
        RawMessage::Key { code, pressed } => match keymap.resolve(code, pressed) {
            Some(key_code) => Translation::Key(KeyEvent {
                key: Key::Code(key_code),
                state: press_state(pressed),
            }),
            // Already delivered as text input; dropping it here avoids
            // double delivery of character vs. function-key events.
            None => Translation::Swallowed,
        },
        RawMessage::Character { code } => {
            if code <= FIRST_PRINTABLE {
                return Translation::Swallowed;
            }
            match char::from_u32(code) {
                Some(c) => Translation::Key(KeyEvent {
                    key: Key::Char(c),
                    state: PressState::Pressed,
                }),
                None => {
                    log::warn!("Dropping text input with invalid code point {code:#x}");
                    Translation::Swallowed
                }
            }
        }
        RawMessage::CloseRequested => Translation::Close(WindowCloseEvent),
        RawMessage::FocusChanged { gained } => Translation::Focus(FocusEvent { has_focus: gained }),
        RawMessage::DestroyAck => Translation::ClientDestroyed,
        RawMessage::NcDestroyAck => Translation::NonClientDestroyed,
        RawMessage::Other(_) => Translation::Unhandled,
    }
}
