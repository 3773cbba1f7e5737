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

//! Topology protocol tests against a scripted in-memory backend.

use anyhow::Result;
use oriel_display::{
    ActiveMode, BackendError, Connection, Crtc, CrtcExtrema, CrtcId, DisplayBackend,
    DisplaySummary, DisplayTopology, GammaRamp, IndexError, Mode, ModeId, Output, OutputId,
    TopologyError,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// The scripted screen. The backend reads and mutates it; tests inspect it
/// afterwards through the shared handle.
struct Screen {
    version: Option<(i32, i32)>,
    outputs: Vec<Output>,
    crtcs: Vec<Crtc>,
    modes: Vec<Mode>,
    gamma: HashMap<u32, GammaRamp>,
    primary: OutputId,
    gamma_reads: usize,
    apply_attempts: Vec<CrtcId>,
    applied_gamma: Vec<CrtcId>,
    primary_sets: Vec<OutputId>,
    fail_apply_once: Option<CrtcId>,
}

struct MockBackend {
    screen: Rc<RefCell<Screen>>,
}

impl DisplayBackend for MockBackend {
    fn query_version(&mut self) -> Option<(i32, i32)> {
        self.screen.borrow().version
    }

    fn query_outputs(&mut self) -> Result<Vec<Output>, BackendError> {
        Ok(self.screen.borrow().outputs.clone())
    }

    fn query_crtcs(&mut self) -> Result<Vec<Crtc>, BackendError> {
        Ok(self.screen.borrow().crtcs.clone())
    }

    fn query_modes(&mut self) -> Result<Vec<Mode>, BackendError> {
        Ok(self.screen.borrow().modes.clone())
    }

    fn read_gamma(&mut self, crtc: CrtcId) -> Result<GammaRamp, BackendError> {
        let mut screen = self.screen.borrow_mut();
        screen.gamma_reads += 1;
        screen
            .gamma
            .get(&crtc.0)
            .cloned()
            .ok_or_else(|| BackendError::Query {
                reason: format!("no gamma for CRTC {}", crtc.0),
            })
    }

    fn apply_crtc(&mut self, crtc: &Crtc) -> Result<(), BackendError> {
        let mut screen = self.screen.borrow_mut();
        screen.apply_attempts.push(crtc.id);
        if screen.fail_apply_once == Some(crtc.id) {
            screen.fail_apply_once = None;
            return Err(BackendError::Apply {
                reason: "scripted failure".into(),
            });
        }
        match screen.crtcs.iter_mut().find(|c| c.id == crtc.id) {
            Some(existing) => {
                *existing = crtc.clone();
                Ok(())
            }
            None => Err(BackendError::Apply {
                reason: format!("unknown CRTC {}", crtc.id.0),
            }),
        }
    }

    fn apply_gamma(&mut self, crtc: CrtcId, ramp: &GammaRamp) -> Result<(), BackendError> {
        let mut screen = self.screen.borrow_mut();
        screen.applied_gamma.push(crtc);
        screen.gamma.insert(crtc.0, ramp.clone());
        Ok(())
    }

    fn set_primary(&mut self, output: OutputId) -> Result<(), BackendError> {
        let mut screen = self.screen.borrow_mut();
        screen.primary_sets.push(output);
        screen.primary = output;
        Ok(())
    }

    fn primary_output(&mut self) -> OutputId {
        self.screen.borrow().primary
    }
}

fn mode(id: u32, width: u32, height: u32, refresh: f64) -> Mode {
    Mode {
        id: ModeId(id),
        width,
        height,
        refresh,
    }
}

fn ramp(level: u16) -> GammaRamp {
    GammaRamp {
        red: vec![0, level],
        green: vec![0, level],
        blue: vec![0, level],
    }
}

/// Two connected outputs (one active, one disabled), one disconnected
/// output cloned onto the active CRTC, and a spare disabled CRTC.
fn screen() -> Rc<RefCell<Screen>> {
    Rc::new(RefCell::new(Screen {
        version: Some((1, 6)),
        outputs: vec![
            Output {
                id: OutputId(1),
                name: "HDMI-1".into(),
                connection: Connection::Connected,
                crtc: Some(CrtcId(100)),
                modes: vec![ModeId(11), ModeId(10), ModeId(12)],
                preferred: Some(1),
                clones: vec![OutputId(3)],
            },
            Output {
                id: OutputId(2),
                name: "DVI-1".into(),
                connection: Connection::Connected,
                crtc: None,
                modes: vec![ModeId(10)],
                preferred: None,
                clones: vec![],
            },
            Output {
                id: OutputId(3),
                name: "VGA-1".into(),
                connection: Connection::Disconnected,
                crtc: None,
                modes: vec![],
                preferred: None,
                clones: vec![],
            },
        ],
        crtcs: vec![
            Crtc {
                id: CrtcId(100),
                mode: Some(ModeId(11)),
                x: 0,
                y: 0,
                outputs: vec![OutputId(1), OutputId(3)],
            },
            Crtc {
                id: CrtcId(101),
                mode: None,
                x: 1920,
                y: 0,
                outputs: vec![],
            },
        ],
        // Deliberately unsorted; the topology layer sorts on reload.
        modes: vec![mode(11, 1920, 1080, 60.0), mode(10, 1280, 720, 60.0), mode(12, 1920, 1080, 50.0)],
        gamma: HashMap::from([(100, ramp(100)), (101, ramp(101))]),
        primary: OutputId(1),
        gamma_reads: 0,
        apply_attempts: Vec::new(),
        applied_gamma: Vec::new(),
        primary_sets: Vec::new(),
        fail_apply_once: None,
    }))
}

fn topology(screen: &Rc<RefCell<Screen>>, restore_on_end: bool) -> DisplayTopology {
    let _ = env_logger::builder().is_test(true).try_init();
    DisplayTopology::new(
        Box::new(MockBackend {
            screen: Rc::clone(screen),
        }),
        restore_on_end,
    )
}

fn summary_for<'a>(summaries: &'a [DisplaySummary], name: &str) -> &'a DisplaySummary {
    summaries
        .iter()
        .find(|s| s.name == name)
        .unwrap_or_else(|| panic!("no summary for {name}"))
}

#[test]
fn absent_extension_is_non_fatal() -> Result<()> {
    let screen = screen();
    screen.borrow_mut().version = None;
    let mut topology = topology(&screen, true);

    assert!(!topology.init_support()?);
    assert!(!topology.is_supported());
    assert!(topology.display_summaries()?.is_empty());
    assert_eq!(topology.reload(false, false), Err(TopologyError::Unsupported));
    assert!(topology.extremal_crtcs().is_none());
    topology.end_support();
    Ok(())
}

#[test]
fn init_captures_the_default_configuration() -> Result<()> {
    let screen = screen();
    let mut topology = topology(&screen, true);

    assert!(topology.init_support()?);
    assert!(!topology.init_support()?, "second init is a no-op");
    assert_eq!(topology.version(), Some((1, 6)));

    let default = topology.default_config().expect("default snapshot").clone();
    assert_eq!(default.primary, OutputId(1));
    assert_eq!(default.crtcs.len(), 2);
    assert_eq!(default.gamma, vec![ramp(100), ramp(101)]);
    assert_eq!(Some(&default), topology.latest_config());
    Ok(())
}

#[test]
fn summaries_skip_disconnected_outputs() -> Result<()> {
    let screen = screen();
    let mut topology = topology(&screen, true);
    topology.init_support()?;

    let summaries = topology.display_summaries()?;
    assert_eq!(summaries.len(), 2, "VGA-1 is disconnected: {summaries:?}");

    let hdmi = summary_for(&summaries, "HDMI-1");
    assert!(hdmi.enabled);
    assert_eq!(
        hdmi.current,
        Some(ActiveMode {
            width: 1920,
            height: 1080,
            x: 0,
            y: 0,
            refresh: 60.0,
        })
    );
    assert_eq!(hdmi.clones, vec![OutputId(3)]);

    let dvi = summary_for(&summaries, "DVI-1");
    assert!(!dvi.enabled);
    assert_eq!(dvi.current, None);
    assert!(dvi.clones.is_empty());
    Ok(())
}

#[test]
fn mode_lists_are_ascending_with_one_preferred_flag() -> Result<()> {
    let screen = screen();
    let mut topology = topology(&screen, true);
    topology.init_support()?;

    let summaries = topology.display_summaries()?;
    let hdmi = summary_for(&summaries, "HDMI-1");

    let ids: Vec<u32> = hdmi.modes.iter().map(|m| m.id.0).collect();
    assert_eq!(ids, vec![10, 12, 11], "ascending by (width, height, refresh)");
    let preferred: Vec<u32> = hdmi
        .modes
        .iter()
        .filter(|m| m.preferred)
        .map(|m| m.id.0)
        .collect();
    // The native preferred index is 1-based into the output's own mode
    // list, whose first entry is mode 11.
    assert_eq!(preferred, vec![11]);
    Ok(())
}

#[test]
fn reload_is_idempotent_and_reuses_gamma() -> Result<()> {
    let screen = screen();
    let mut topology = topology(&screen, true);
    topology.init_support()?;
    let reads_after_init = screen.borrow().gamma_reads;

    let first = topology.display_summaries()?;
    let second = topology.display_summaries()?;
    assert_eq!(first, second);
    assert_eq!(
        screen.borrow().gamma_reads,
        reads_after_init,
        "partial reloads must not re-read gamma ramps"
    );

    topology.reload(true, false)?;
    assert_eq!(
        screen.borrow().gamma_reads,
        reads_after_init + 2,
        "a full reload reads one ramp per CRTC"
    );
    Ok(())
}

#[test]
fn display_index_outcomes() -> Result<()> {
    let screen = screen();
    let mut topology = topology(&screen, true);
    topology.init_support()?;
    let summaries = topology.display_summaries()?;

    let hdmi = summary_for(&summaries, "HDMI-1").clone();
    assert_eq!(topology.index_of_display(&hdmi), Ok(0));

    let dvi = summary_for(&summaries, "DVI-1").clone();
    assert_eq!(topology.index_of_display(&dvi), Err(IndexError::Disabled));

    let mut stale = hdmi.clone();
    stale.output = OutputId(99);
    assert_eq!(topology.index_of_display(&stale), Err(IndexError::Stale));

    // An output referencing a CRTC the enumeration does not know about is
    // a topology-tracking bug and reported as such.
    screen.borrow_mut().outputs[0].crtc = Some(CrtcId(555));
    assert_eq!(
        topology.index_of_display(&hdmi),
        Err(IndexError::TopologyCorrupt)
    );
    Ok(())
}

#[test]
fn set_primary_is_immediate() -> Result<()> {
    let screen = screen();
    let mut topology = topology(&screen, true);
    topology.init_support()?;
    let summaries = topology.display_summaries()?;

    topology.set_primary(summary_for(&summaries, "DVI-1"))?;
    assert_eq!(screen.borrow().primary, OutputId(2));
    assert!(
        !topology.screen_changed(),
        "the primary designation is not a screen change"
    );
    Ok(())
}

#[test]
fn staged_settings_apply_and_mark_the_session() -> Result<()> {
    let screen = screen();
    let mut topology = topology(&screen, true);
    topology.init_support()?;
    assert!(!topology.screen_changed());

    topology.stage_crtc(Crtc {
        id: CrtcId(101),
        mode: Some(ModeId(12)),
        x: 0,
        y: 0,
        outputs: vec![],
    });
    // Restaging the same CRTC keeps the later assignment.
    topology.stage_crtc(Crtc {
        id: CrtcId(101),
        mode: Some(ModeId(10)),
        x: 1280,
        y: 0,
        outputs: vec![OutputId(2)],
    });
    topology.apply_new_settings()?;

    assert!(topology.screen_changed());
    assert_eq!(screen.borrow().apply_attempts, vec![CrtcId(101)]);
    let latest = topology.latest_config().expect("snapshot after apply");
    let applied = latest.crtcs.iter().find(|c| c.id == CrtcId(101)).unwrap();
    assert_eq!(applied.mode, Some(ModeId(10)));
    assert_eq!(applied.x, 1280);
    Ok(())
}

#[test]
fn failed_crtc_assignment_is_retried_once() -> Result<()> {
    let screen = screen();
    screen.borrow_mut().fail_apply_once = Some(CrtcId(101));
    let mut topology = topology(&screen, true);
    topology.init_support()?;

    topology.stage_crtc(Crtc {
        id: CrtcId(101),
        mode: Some(ModeId(10)),
        x: 1280,
        y: 0,
        outputs: vec![],
    });
    topology.apply_new_settings()?;

    assert_eq!(
        screen.borrow().apply_attempts,
        vec![CrtcId(101), CrtcId(101)],
        "one failing attempt, one successful retry"
    );
    assert!(topology.screen_changed());
    Ok(())
}

#[test]
fn restore_precheck_mutates_nothing() -> Result<()> {
    let screen = screen();
    let mut topology = topology(&screen, true);
    topology.init_support()?;

    let mut foreign = topology.default_config().unwrap().clone();
    foreign.gamma.pop();
    assert_eq!(
        topology.restore(&foreign),
        Err(TopologyError::GammaCountMismatch {
            expected: 2,
            found: 1,
        })
    );

    let screen = screen.borrow();
    assert!(screen.apply_attempts.is_empty());
    assert!(screen.applied_gamma.is_empty());
    assert!(screen.primary_sets.is_empty());
    Ok(())
}

#[test]
fn restore_reapplies_crtcs_primary_and_gamma() -> Result<()> {
    let screen = screen();
    let mut topology = topology(&screen, false);
    topology.init_support()?;
    let default = topology.default_config().unwrap().clone();

    // Drift away from the captured state.
    topology.stage_crtc(Crtc {
        id: CrtcId(100),
        mode: Some(ModeId(10)),
        x: 40,
        y: 40,
        outputs: vec![OutputId(1)],
    });
    topology.apply_new_settings()?;
    screen.borrow_mut().primary = OutputId(2);
    screen.borrow_mut().gamma.insert(100, ramp(7));

    topology.restore(&default)?;

    let screen = screen.borrow();
    assert_eq!(screen.primary, OutputId(1));
    let crtc = screen.crtcs.iter().find(|c| c.id == CrtcId(100)).unwrap();
    assert_eq!(crtc.mode, Some(ModeId(11)));
    assert_eq!((crtc.x, crtc.y), (0, 0));
    assert_eq!(screen.applied_gamma, vec![CrtcId(100), CrtcId(101)]);
    assert_eq!(screen.gamma[&100], ramp(100));
    Ok(())
}

#[test]
fn end_support_restores_only_a_changed_screen() -> Result<()> {
    // Unchanged session: teardown must not touch the platform.
    let screen_a = screen();
    let mut topology_a = topology(&screen_a, true);
    topology_a.init_support()?;
    topology_a.end_support();
    assert!(!topology_a.is_supported());
    assert!(screen_a.borrow().apply_attempts.is_empty());
    assert!(screen_a.borrow().primary_sets.is_empty());

    // Changed session with restore_on_end: teardown restores the default.
    let screen_b = screen();
    let mut topology_b = topology(&screen_b, true);
    topology_b.init_support()?;
    topology_b.stage_crtc(Crtc {
        id: CrtcId(100),
        mode: Some(ModeId(10)),
        x: 0,
        y: 0,
        outputs: vec![OutputId(1)],
    });
    topology_b.apply_new_settings()?;
    drop(topology_b);
    let screen_b = screen_b.borrow();
    assert_eq!(screen_b.primary_sets, vec![OutputId(1)]);
    let crtc = screen_b.crtcs.iter().find(|c| c.id == CrtcId(100)).unwrap();
    assert_eq!(crtc.mode, Some(ModeId(11)), "mode restored on drop");

    // Changed session without restore_on_end: teardown leaves it alone.
    let screen_c = screen();
    let mut topology_c = topology(&screen_c, false);
    topology_c.init_support()?;
    topology_c.stage_crtc(Crtc {
        id: CrtcId(100),
        mode: Some(ModeId(10)),
        x: 0,
        y: 0,
        outputs: vec![OutputId(1)],
    });
    topology_c.apply_new_settings()?;
    topology_c.end_support();
    let crtc = screen_c.borrow().crtcs[0].clone();
    assert_eq!(crtc.mode, Some(ModeId(10)), "change is kept");
    Ok(())
}

#[test]
fn extrema_scan_keeps_the_first_index_on_ties() -> Result<()> {
    let screen = screen();
    {
        let mut s = screen.borrow_mut();
        s.crtcs = vec![
            Crtc {
                id: CrtcId(100),
                mode: Some(ModeId(11)),
                x: 0,
                y: 0,
                outputs: vec![OutputId(1)],
            },
            Crtc {
                id: CrtcId(101),
                mode: Some(ModeId(11)),
                x: 1920,
                y: 0,
                outputs: vec![],
            },
            Crtc {
                id: CrtcId(102),
                mode: Some(ModeId(11)),
                x: 0,
                y: 1080,
                outputs: vec![],
            },
            Crtc {
                id: CrtcId(103),
                mode: Some(ModeId(11)),
                x: 1920,
                y: 1080,
                outputs: vec![],
            },
        ];
        s.gamma = HashMap::from([
            (100, ramp(1)),
            (101, ramp(2)),
            (102, ramp(3)),
            (103, ramp(4)),
        ]);
    }
    let mut topology = topology(&screen, true);
    topology.init_support()?;

    assert_eq!(
        topology.extremal_crtcs(),
        Some(CrtcExtrema {
            left: 0,
            right: 1,
            top: 0,
            bottom: 2,
        })
    );
    Ok(())
}
