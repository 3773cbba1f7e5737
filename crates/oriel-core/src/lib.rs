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

//! # Oriel Core
//!
//! Foundational crate for the Oriel windowing substrate: the typed
//! signal/slot bus, the engine event model, the shared window-geometry
//! record, and the platform collaborator contracts consumed by the
//! lifecycle and display crates.

#![warn(missing_docs)]

pub mod event;
pub mod geometry;
pub mod platform;
pub mod signal;

pub use event::InitSignals;
pub use geometry::{SharedGeometry, WindowGeometry};
pub use signal::{Signal, Slot};
