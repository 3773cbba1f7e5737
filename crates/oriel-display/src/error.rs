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

//! Errors of the display-topology layer.

use std::error::Error;
use std::fmt;

/// Failure reported by a [`crate::DisplayBackend`] implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// A read from the platform failed.
    Query {
        /// Platform-specific description.
        reason: String,
    },
    /// A mutation on the platform failed.
    Apply {
        /// Platform-specific description.
        reason: String,
    },
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Query { reason } => write!(f, "Display query failed: {reason}"),
            BackendError::Apply { reason } => write!(f, "Display mutation failed: {reason}"),
        }
    }
}

impl Error for BackendError {}

/// Failure of a topology operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopologyError {
    /// The display extension is absent; the operation is a supported no-op
    /// elsewhere but cannot produce a result here.
    Unsupported,
    /// A configuration's gamma ramps do not match the current CRTC count,
    /// so the snapshot is stale or foreign. Nothing was mutated.
    GammaCountMismatch {
        /// The current CRTC count.
        expected: usize,
        /// The ramp count found in the configuration.
        found: usize,
    },
    /// The backend reported a failure.
    Backend(BackendError),
}

impl fmt::Display for TopologyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopologyError::Unsupported => {
                write!(f, "The display topology extension is not supported")
            }
            TopologyError::GammaCountMismatch { expected, found } => write!(
                f,
                "Configuration holds {found} gamma ramps but there are {expected} CRTCs"
            ),
            TopologyError::Backend(e) => write!(f, "{e}"),
        }
    }
}

impl Error for TopologyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TopologyError::Backend(e) => Some(e),
            _ => None,
        }
    }
}

impl From<BackendError> for TopologyError {
    fn from(e: BackendError) -> Self {
        TopologyError::Backend(e)
    }
}

/// Why an output could not be resolved to a CRTC snapshot index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexError {
    /// The output exists but drives no CRTC.
    Disabled,
    /// The output id was not found in the latest reload; the caller holds a
    /// stale summary and must re-enumerate.
    Stale,
    /// The output references a CRTC id absent from the snapshot. The reload
    /// preceding the lookup should make this impossible; seeing it means
    /// topology tracking is broken.
    TopologyCorrupt,
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexError::Disabled => write!(f, "The display is disabled"),
            IndexError::Stale => write!(f, "The display summary is out of date"),
            IndexError::TopologyCorrupt => {
                write!(f, "The display references a CRTC unknown to the snapshot")
            }
        }
    }
}

impl Error for IndexError {}
