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

//! Window configuration.

use oriel_core::WindowGeometry;
use serde::{Deserialize, Serialize};

/// Settings the window is created with, plus session-wide display policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    /// Window title.
    pub title: String,
    /// Requested client-area width.
    pub width: u32,
    /// Requested client-area height.
    pub height: u32,
    /// Requested x position.
    pub x: i32,
    /// Requested y position.
    pub y: i32,
    /// Whether display topology teardown restores the original screen
    /// configuration if this session changed it.
    pub restore_old_screen_res: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Oriel Engine".to_string(),
            width: 1024,
            height: 768,
            x: 0,
            y: 0,
            restore_old_screen_res: true,
        }
    }
}

impl WindowSettings {
    /// Parses settings from a JSON document. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The geometry to request from the window factory.
    pub fn geometry(&self) -> WindowGeometry {
        WindowGeometry::new(self.x, self.y, self.width, self.height)
    }
}
