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

//! The platform seam of the topology layer.

use crate::error::BackendError;
use crate::types::{Crtc, CrtcId, GammaRamp, Mode, Output, OutputId};

/// Handle to the platform's display extension.
///
/// [`DisplayTopology`](crate::DisplayTopology) drives all queries and
/// mutations through this trait; implementations wrap whatever the platform
/// offers (RandR on X11, the display APIs elsewhere). The extension may be
/// absent, which [`DisplayBackend::query_version`] reports and which is a
/// supported, non-fatal condition.
///
/// Implementations are used from the control thread only and need not be
/// thread-safe.
pub trait DisplayBackend {
    /// The extension version, or `None` if the extension is absent.
    fn query_version(&mut self) -> Option<(i32, i32)>;

    /// Enumerates all outputs, connected or not.
    fn query_outputs(&mut self) -> Result<Vec<Output>, BackendError>;

    /// Enumerates all CRTCs.
    fn query_crtcs(&mut self) -> Result<Vec<Crtc>, BackendError>;

    /// Enumerates all modes known to the platform.
    fn query_modes(&mut self) -> Result<Vec<Mode>, BackendError>;

    /// Reads the current gamma ramp of one CRTC.
    fn read_gamma(&mut self, crtc: CrtcId) -> Result<GammaRamp, BackendError>;

    /// Applies one CRTC assignment (mode, position, driven outputs).
    fn apply_crtc(&mut self, crtc: &Crtc) -> Result<(), BackendError>;

    /// Applies a gamma ramp to one CRTC.
    fn apply_gamma(&mut self, crtc: CrtcId, ramp: &GammaRamp) -> Result<(), BackendError>;

    /// Designates the primary output. Takes effect immediately.
    fn set_primary(&mut self, output: OutputId) -> Result<(), BackendError>;

    /// The currently designated primary output.
    fn primary_output(&mut self) -> OutputId;
}
