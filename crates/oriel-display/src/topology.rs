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

//! Snapshot, reload and apply protocol over a [`DisplayBackend`].

use crate::backend::DisplayBackend;
use crate::error::{IndexError, TopologyError};
use crate::types::{
    ActiveMode, Configuration, Connection, Crtc, DisplaySummary, GammaRamp, ModeLine,
};

/// Snapshot indices of the outermost CRTCs, one per direction. Ties keep
/// the first-encountered index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrtcExtrema {
    /// Index of the CRTC with the smallest x position.
    pub left: usize,
    /// Index of the CRTC with the largest x position.
    pub right: usize,
    /// Index of the CRTC with the smallest y position.
    pub top: usize,
    /// Index of the CRTC with the largest y position.
    pub bottom: usize,
}

/// Queries and mutates the monitor configuration backing the rendering
/// surface.
///
/// Owned and driven by the control thread; operations are not reentrant
/// and there is no internal locking. Absence of the platform's display
/// extension is non-fatal: [`DisplayTopology::init_support`] reports it
/// once and later operations degrade to no-ops or
/// [`TopologyError::Unsupported`].
pub struct DisplayTopology {
    backend: Box<dyn DisplayBackend>,
    supported: bool,
    version: Option<(i32, i32)>,
    outputs: Vec<crate::types::Output>,
    crtcs: Vec<Crtc>,
    modes: Vec<crate::types::Mode>,
    default_config: Option<Configuration>,
    latest_config: Option<Configuration>,
    staged: Vec<Crtc>,
    screen_changed: bool,
    restore_on_end: bool,
}

impl DisplayTopology {
    /// Wraps a backend. `restore_on_end` requests that the configuration
    /// captured at [`DisplayTopology::init_support`] is restored on
    /// teardown if the session changed the screen.
    pub fn new(backend: Box<dyn DisplayBackend>, restore_on_end: bool) -> Self {
        Self {
            backend,
            supported: false,
            version: None,
            outputs: Vec::new(),
            crtcs: Vec::new(),
            modes: Vec::new(),
            default_config: None,
            latest_config: None,
            staged: Vec::new(),
            screen_changed: false,
            restore_on_end,
        }
    }

    /// Detects the display extension and, if present, captures the initial
    /// configuration snapshot.
    ///
    /// Returns `Ok(false)` when support is already initialized or the
    /// extension is absent.
    pub fn init_support(&mut self) -> Result<bool, TopologyError> {
        if self.supported {
            return Ok(false);
        }

        match self.backend.query_version() {
            Some(version) => {
                self.version = Some(version);
                self.supported = true;
            }
            None => {
                log::warn!(
                    "Display topology extension not supported. Screen resolution wont be changed"
                );
                return Ok(false);
            }
        }

        self.reload(true, true)?;
        log::info!(
            "Display topology support initialized (extension version {}.{})",
            self.version.unwrap_or((0, 0)).0,
            self.version.unwrap_or((0, 0)).1
        );
        Ok(true)
    }

    /// Whether the display extension is present and support is active.
    pub fn is_supported(&self) -> bool {
        self.supported
    }

    /// The extension version reported at initialization.
    pub fn version(&self) -> Option<(i32, i32)> {
        self.version
    }

    /// Whether this session has changed the screen configuration.
    pub fn screen_changed(&self) -> bool {
        self.screen_changed
    }

    /// The configuration captured at initialization.
    pub fn default_config(&self) -> Option<&Configuration> {
        self.default_config.as_ref()
    }

    /// The configuration captured by the most recent reload.
    pub fn latest_config(&self) -> Option<&Configuration> {
        self.latest_config.as_ref()
    }

    /// Re-queries outputs, CRTCs and modes from the platform and rebuilds
    /// the latest configuration snapshot. Idempotent: with no topology
    /// change, two calls yield identical snapshots.
    ///
    /// `force_full` also re-reads the gamma ramps, which is expensive;
    /// read-mostly callers skip it and reuse the previous ramps. `initial`
    /// additionally captures the snapshot as the default configuration.
    pub fn reload(&mut self, force_full: bool, initial: bool) -> Result<(), TopologyError> {
        if !self.supported {
            return Err(TopologyError::Unsupported);
        }

        let outputs = self.backend.query_outputs()?;
        let crtcs = self.backend.query_crtcs()?;
        let mut modes = self.backend.query_modes()?;
        modes.sort();

        let previous = self.latest_config.take();
        let gamma = match previous {
            // Ramp reuse is positional; a CRTC count change invalidates it.
            Some(config) if !force_full && config.gamma.len() == crtcs.len() => config.gamma,
            _ => {
                let mut ramps = Vec::with_capacity(crtcs.len());
                for crtc in &crtcs {
                    ramps.push(self.backend.read_gamma(crtc.id)?);
                }
                ramps
            }
        };

        let config = Configuration {
            crtcs: crtcs.clone(),
            gamma,
            primary: self.backend.primary_output(),
        };
        if initial {
            self.default_config = Some(config.clone());
        }
        self.latest_config = Some(config);

        self.outputs = outputs;
        self.crtcs = crtcs;
        self.modes = modes;
        Ok(())
    }

    /// One summary per connected output: the active mode, the supported
    /// modes ascending with the preferred flag, and the clone set.
    /// Disconnected outputs are skipped entirely.
    ///
    /// Returns an empty list when support is not active.
    pub fn display_summaries(&mut self) -> Result<Vec<DisplaySummary>, TopologyError> {
        if !self.supported {
            return Ok(Vec::new());
        }
        self.reload(false, false)?;

        let mut summaries = Vec::new();
        for output in &self.outputs {
            if output.connection != Connection::Connected {
                continue;
            }

            let mut current = None;
            let mut clones = Vec::new();
            if let Some(crtc_id) = output.crtc {
                if let Some(crtc) = self.crtcs.iter().find(|c| c.id == crtc_id) {
                    current = crtc.mode.and_then(|mode_id| {
                        self.modes.iter().find(|m| m.id == mode_id).map(|mode| {
                            ActiveMode {
                                width: mode.width,
                                height: mode.height,
                                x: crtc.x,
                                y: crtc.y,
                                refresh: mode.refresh,
                            }
                        })
                    });
                    clones = crtc
                        .outputs
                        .iter()
                        .copied()
                        .filter(|id| *id != output.id)
                        .collect();
                }
            }

            // self.modes is kept sorted, so membership-filtered rows come
            // out ascending. The preferred index is 1-based native data.
            let modes = self
                .modes
                .iter()
                .filter_map(|mode| {
                    let position = output.modes.iter().position(|id| *id == mode.id)?;
                    Some(ModeLine {
                        id: mode.id,
                        preferred: output.preferred == Some(position + 1),
                        width: mode.width,
                        height: mode.height,
                        refresh: mode.refresh,
                    })
                })
                .collect();

            summaries.push(DisplaySummary {
                name: output.name.clone(),
                output: output.id,
                enabled: output.crtc.is_some(),
                current,
                modes,
                clones,
            });
        }
        Ok(summaries)
    }

    /// Designates the summarized output as primary. Takes effect
    /// immediately and is unrelated to
    /// [`DisplayTopology::apply_new_settings`].
    pub fn set_primary(&mut self, display: &DisplaySummary) -> Result<(), TopologyError> {
        if !self.supported {
            return Err(TopologyError::Unsupported);
        }
        self.backend.set_primary(display.output)?;
        Ok(())
    }

    /// Stages one CRTC assignment for the next
    /// [`DisplayTopology::apply_new_settings`]. Staging the same CRTC
    /// twice keeps the later assignment.
    pub fn stage_crtc(&mut self, crtc: Crtc) {
        if let Some(existing) = self.staged.iter_mut().find(|c| c.id == crtc.id) {
            *existing = crtc;
        } else {
            self.staged.push(crtc);
        }
    }

    /// Applies every staged CRTC assignment. A failed assignment is warned
    /// and retried once; a second failure is warned and skipped so the
    /// remaining assignments still go through. Marks the session as having
    /// changed the screen and refreshes the snapshot.
    pub fn apply_new_settings(&mut self) -> Result<(), TopologyError> {
        if !self.supported {
            return Err(TopologyError::Unsupported);
        }
        if self.staged.is_empty() {
            return Ok(());
        }

        for crtc in std::mem::take(&mut self.staged) {
            if let Err(e) = self.backend.apply_crtc(&crtc) {
                log::warn!("Failed to apply CRTC {:?}: {e}; retrying", crtc.id);
                if let Err(e) = self.backend.apply_crtc(&crtc) {
                    log::warn!("Failed to apply CRTC {:?} again: {e}; skipping", crtc.id);
                    continue;
                }
            }
            self.screen_changed = true;
        }

        self.reload(false, false)
    }

    /// Reapplies a previously captured configuration: CRTC assignments,
    /// primary designation and gamma ramps, as one coordinated operation.
    ///
    /// Gamma ramps are indexed positionally against CRTCs, so a count
    /// mismatch means the snapshot is stale or foreign; in that case the
    /// restore fails before mutating anything.
    pub fn restore(&mut self, config: &Configuration) -> Result<(), TopologyError> {
        if !self.supported {
            return Err(TopologyError::Unsupported);
        }
        self.reload(false, false)?;

        if config.gamma.len() != self.crtcs.len() {
            log::error!(
                "Fatal internal error: configuration holds {} gamma ramps for {} CRTCs",
                config.gamma.len(),
                self.crtcs.len()
            );
            return Err(TopologyError::GammaCountMismatch {
                expected: self.crtcs.len(),
                found: config.gamma.len(),
            });
        }

        self.staged.clear();
        self.staged.extend(config.crtcs.iter().cloned());
        self.apply_new_settings()?;

        self.backend.set_primary(config.primary)?;

        for (crtc, ramp) in config.crtcs.iter().zip(&config.gamma) {
            self.backend.apply_gamma(crtc.id, ramp)?;
        }
        Ok(())
    }

    /// Resolves a summarized output to its index in the CRTC snapshot.
    ///
    /// Reloads first, so [`IndexError::TopologyCorrupt`] should be
    /// impossible and indicates a topology-tracking bug.
    pub fn index_of_display(&mut self, display: &DisplaySummary) -> Result<usize, IndexError> {
        if let Err(e) = self.reload(false, false) {
            log::warn!("Reload before display index lookup failed: {e}");
        }

        let output = match self.outputs.iter().find(|o| o.id == display.output) {
            Some(output) => output,
            None => return Err(IndexError::Stale),
        };
        let crtc_id = match output.crtc {
            Some(id) => id,
            None => return Err(IndexError::Disabled),
        };

        match self.crtcs.iter().position(|c| c.id == crtc_id) {
            Some(index) => Ok(index),
            None => {
                log::error!(
                    "Output {:?} references CRTC {:?} which the reload did not enumerate",
                    output.id,
                    crtc_id
                );
                Err(IndexError::TopologyCorrupt)
            }
        }
    }

    /// Finds the most left, right, top and bottom CRTC in one linear scan.
    /// `None` when unsupported or no CRTC is enumerated.
    pub fn extremal_crtcs(&mut self) -> Option<CrtcExtrema> {
        if let Err(e) = self.reload(false, false) {
            log::warn!("Reload before CRTC extrema scan failed: {e}");
        }
        let first = self.crtcs.first()?;

        let mut extrema = CrtcExtrema {
            left: 0,
            right: 0,
            top: 0,
            bottom: 0,
        };
        let (mut min_x, mut max_x) = (first.x, first.x);
        let (mut min_y, mut max_y) = (first.y, first.y);

        for (index, crtc) in self.crtcs.iter().enumerate().skip(1) {
            if crtc.x < min_x {
                extrema.left = index;
                min_x = crtc.x;
            }
            if crtc.x > max_x {
                extrema.right = index;
                max_x = crtc.x;
            }
            if crtc.y < min_y {
                extrema.top = index;
                min_y = crtc.y;
            }
            if crtc.y > max_y {
                extrema.bottom = index;
                max_y = crtc.y;
            }
        }
        Some(extrema)
    }

    /// Ends topology support: restores the initial configuration if
    /// configured to and the session changed the screen, then drops every
    /// snapshot. Further operations report unsupported.
    pub fn end_support(&mut self) {
        if !self.supported {
            return;
        }

        if self.restore_on_end && self.screen_changed {
            if let Some(config) = self.default_config.clone() {
                if let Err(e) = self.restore(&config) {
                    log::warn!("Failed to restore the initial screen configuration: {e}");
                }
            }
        }

        self.outputs.clear();
        self.crtcs.clear();
        self.modes.clear();
        self.staged.clear();
        self.default_config = None;
        self.latest_config = None;
        self.supported = false;
        log::info!("Display topology support ended");
    }

    /// Dumps the current snapshot to the debug log.
    pub fn log_status(&self) {
        log::debug!(
            "Display topology: supported={} version={:?} changed={}",
            self.supported,
            self.version,
            self.screen_changed
        );
        for output in &self.outputs {
            log::debug!(
                "  Output {:?} '{}' {:?} crtc={:?} modes={} preferred={:?}",
                output.id,
                output.name,
                output.connection,
                output.crtc,
                output.modes.len(),
                output.preferred
            );
        }
        for crtc in &self.crtcs {
            log::debug!(
                "  CRTC {:?} mode={:?} at ({}, {}) outputs={:?}",
                crtc.id,
                crtc.mode,
                crtc.x,
                crtc.y,
                crtc.outputs
            );
        }
        for mode in &self.modes {
            log::debug!(
                "  Mode {:?} {}x{} @ {:.2} Hz",
                mode.id,
                mode.width,
                mode.height,
                mode.refresh
            );
        }
    }

    /// Gamma ramps captured by the latest reload, one per CRTC snapshot
    /// entry.
    pub fn gamma_ramps(&self) -> &[GammaRamp] {
        self.latest_config
            .as_ref()
            .map(|c| c.gamma.as_slice())
            .unwrap_or(&[])
    }
}

impl Drop for DisplayTopology {
    fn drop(&mut self) {
        self.end_support();
    }
}
