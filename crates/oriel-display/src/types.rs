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

//! Entities of the display topology.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Identifier of a physical connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutputId(pub u32);

/// Identifier of a scan-out unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CrtcId(pub u32);

/// Identifier of a display timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModeId(pub u32);

/// Connection state of an output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Connection {
    /// A monitor is attached.
    Connected,
    /// Nothing attached.
    Disconnected,
    /// The platform cannot tell.
    Unknown,
}

impl Connection {
    /// Decodes the native connection code (0 connected, 1 disconnected,
    /// everything else unknown).
    pub fn from_native(value: u32) -> Self {
        match value {
            0 => Connection::Connected,
            1 => Connection::Disconnected,
            _ => Connection::Unknown,
        }
    }
}

/// A physical connector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Output {
    /// Native identifier.
    pub id: OutputId,
    /// Human-readable connector name, e.g. `HDMI-1`.
    pub name: String,
    /// Connection state.
    pub connection: Connection,
    /// The CRTC currently driving this output, if any.
    pub crtc: Option<CrtcId>,
    /// Supported mode ids, in the platform's native order.
    pub modes: Vec<ModeId>,
    /// 1-based index into `modes` of the output's native preferred mode,
    /// as the platform reports it. `None` if the output has no preference.
    pub preferred: Option<usize>,
    /// Other outputs driven by the same CRTC.
    pub clones: Vec<OutputId>,
}

/// A display timing.
///
/// Totally ordered by (width, height, refresh, id) so mode lists enumerate
/// deterministically; the id tie-break keeps [`Ord`] consistent with
/// [`PartialEq`] when two modes share a geometry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Mode {
    /// Native identifier.
    pub id: ModeId,
    /// Horizontal resolution in pixels.
    pub width: u32,
    /// Vertical resolution in pixels.
    pub height: u32,
    /// Refresh rate in Hz.
    pub refresh: f64,
}

impl PartialEq for Mode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Mode {}

impl PartialOrd for Mode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Mode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.width
            .cmp(&other.width)
            .then(self.height.cmp(&other.height))
            .then(self.refresh.total_cmp(&other.refresh))
            .then(self.id.0.cmp(&other.id.0))
    }
}

/// A scan-out unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crtc {
    /// Native identifier.
    pub id: CrtcId,
    /// The mode currently scanned out, `None` if the CRTC is disabled.
    pub mode: Option<ModeId>,
    /// Horizontal position on the framebuffer.
    pub x: i32,
    /// Vertical position on the framebuffer.
    pub y: i32,
    /// Outputs driven by this CRTC.
    pub outputs: Vec<OutputId>,
}

/// An owned gamma ramp snapshot. Dropping it releases the data; there is no
/// native handle to free.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GammaRamp {
    /// Red channel lookup table.
    pub red: Vec<u16>,
    /// Green channel lookup table.
    pub green: Vec<u16>,
    /// Blue channel lookup table.
    pub blue: Vec<u16>,
}

/// A full configuration snapshot: CRTC assignments, gamma ramps indexed
/// positionally against the CRTCs, and the primary output designation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// CRTC assignments at snapshot time.
    pub crtcs: Vec<Crtc>,
    /// One gamma ramp per CRTC, same order as `crtcs`.
    pub gamma: Vec<GammaRamp>,
    /// The primary output at snapshot time.
    pub primary: OutputId,
}

/// The mode an output is currently scanning out, with its position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveMode {
    /// Horizontal resolution in pixels.
    pub width: u32,
    /// Vertical resolution in pixels.
    pub height: u32,
    /// Horizontal position on the framebuffer.
    pub x: i32,
    /// Vertical position on the framebuffer.
    pub y: i32,
    /// Refresh rate in Hz.
    pub refresh: f64,
}

/// One row of an output's supported-mode list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeLine {
    /// Native mode identifier.
    pub id: ModeId,
    /// Whether this is the output's native preferred mode.
    pub preferred: bool,
    /// Horizontal resolution in pixels.
    pub width: u32,
    /// Vertical resolution in pixels.
    pub height: u32,
    /// Refresh rate in Hz.
    pub refresh: f64,
}

/// Everything an application needs to present one connected output to the
/// user: identity, current state, the selectable modes and the clone set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySummary {
    /// Connector name.
    pub name: String,
    /// Native output identifier.
    pub output: OutputId,
    /// Whether the output currently drives a CRTC.
    pub enabled: bool,
    /// The active mode, present only for enabled outputs.
    pub current: Option<ActiveMode>,
    /// Supported modes, ascending by (width, height, refresh).
    pub modes: Vec<ModeLine>,
    /// Other outputs sharing this output's CRTC.
    pub clones: Vec<OutputId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mode(id: u32, width: u32, height: u32, refresh: f64) -> Mode {
        Mode {
            id: ModeId(id),
            width,
            height,
            refresh,
        }
    }

    #[test]
    fn modes_order_by_width_then_height_then_refresh() {
        let mut modes = vec![
            mode(1, 1920, 1080, 60.0),
            mode(2, 1280, 1024, 75.0),
            mode(3, 1920, 1080, 59.9),
            mode(4, 1280, 720, 60.0),
            mode(5, 1280, 1024, 60.0),
        ];
        modes.sort();
        let ids: Vec<u32> = modes.iter().map(|m| m.id.0).collect();
        assert_eq!(ids, vec![4, 5, 2, 3, 1]);
    }

    #[test]
    fn equal_geometry_breaks_ties_by_id() {
        let a = mode(10, 1024, 768, 60.0);
        let b = mode(11, 1024, 768, 60.0);
        assert_ne!(a, b);
        assert!(a < b);
    }

    #[test]
    fn connection_decodes_native_codes() {
        assert_eq!(Connection::from_native(0), Connection::Connected);
        assert_eq!(Connection::from_native(1), Connection::Disconnected);
        assert_eq!(Connection::from_native(2), Connection::Unknown);
        assert_eq!(Connection::from_native(77), Connection::Unknown);
    }
}
