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

//! Display topology for the Oriel engine.
//!
//! Enumerates outputs, CRTCs and modes through a [`DisplayBackend`]
//! implementation, keeps versioned configuration snapshots, and applies or
//! restores output configurations. All of this runs on the control thread;
//! nothing in this crate takes a lock.

pub mod backend;
pub mod error;
pub mod topology;
pub mod types;

pub use backend::DisplayBackend;
pub use error::{BackendError, IndexError, TopologyError};
pub use topology::{CrtcExtrema, DisplayTopology};
pub use types::{
    ActiveMode, Configuration, Connection, Crtc, CrtcId, DisplaySummary, GammaRamp, Mode, ModeId,
    ModeLine, Output, OutputId,
};
