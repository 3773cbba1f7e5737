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

//! # Oriel Init
//!
//! The window/context lifecycle subsystem. Two threads cooperate here: the
//! control thread, which embeds application and renderer logic and drives
//! the [`WindowService`] facade, and the event thread, which runs the
//! [`controller::WindowEventController`] pump loop, translates native
//! messages, and publishes typed events on the signal channels.
//!
//! The two threads rendezvous once at window creation and repeatedly at
//! start/pause/resume/stop transitions, through one mutex/condvar pair per
//! concern (see [`lifecycle`]).

pub mod config;
pub mod controller;
pub mod error;
pub mod lifecycle;
pub mod service;

mod translate;

pub use config::WindowSettings;
pub use error::InitError;
pub use lifecycle::LoopState;
pub use service::WindowService;
