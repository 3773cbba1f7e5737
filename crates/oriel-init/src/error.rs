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

//! Errors of the lifecycle facade.

use oriel_core::platform::PlatformError;
use std::fmt;

/// An error from [`crate::WindowService`].
#[derive(Debug)]
pub enum InitError {
    /// `create_window` was called more than once on the same service.
    AlreadyCreated,
    /// An operation that needs a window was called before `create_window`.
    NotCreated,
    /// The event thread could not be spawned.
    ThreadSpawn {
        /// OS-reported reason.
        reason: String,
    },
    /// The window factory failed on the event thread.
    WindowCreation(PlatformError),
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::AlreadyCreated => {
                write!(f, "The window was already created for this service")
            }
            InitError::NotCreated => {
                write!(f, "No window has been created yet")
            }
            InitError::ThreadSpawn { reason } => {
                write!(f, "Failed to spawn the event thread: {reason}")
            }
            InitError::WindowCreation(e) => {
                write!(f, "Window creation failed: {e}")
            }
        }
    }
}

impl std::error::Error for InitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InitError::WindowCreation(e) => Some(e),
            _ => None,
        }
    }
}
