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

//! The shared "current window geometry" record.
//!
//! Resize and move events update this record from the event thread; the
//! renderer and application read it from any thread. The record is
//! version-tagged so readers never observe a torn update: only the event
//! thread writes, and a read retries while a write is in flight.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI32, AtomicU32, Ordering};

/// Position and client-area size of a window, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WindowGeometry {
    /// Window x position.
    pub x: i32,
    /// Window y position.
    pub y: i32,
    /// Client-area width.
    pub width: u32,
    /// Client-area height.
    pub height: u32,
}

impl WindowGeometry {
    /// Builds a geometry value.
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Single-writer, multi-reader geometry record.
///
/// Writes happen only on the event thread. The sequence counter is odd while
/// a write is in progress; [`SharedGeometry::load`] spins until it reads the
/// same even counter on both sides of the field reads.
#[derive(Debug, Default)]
pub struct SharedGeometry {
    seq: AtomicU32,
    x: AtomicI32,
    y: AtomicI32,
    width: AtomicU32,
    height: AtomicU32,
}

impl SharedGeometry {
    /// Creates a record holding `initial`.
    pub fn new(initial: WindowGeometry) -> Self {
        let record = Self::default();
        record.store(initial);
        record
    }

    /// Publishes a new geometry. Must only be called from the event thread.
    pub fn store(&self, geometry: WindowGeometry) {
        let seq = self.seq.load(Ordering::Relaxed);
        self.seq.store(seq.wrapping_add(1), Ordering::SeqCst);
        self.x.store(geometry.x, Ordering::SeqCst);
        self.y.store(geometry.y, Ordering::SeqCst);
        self.width.store(geometry.width, Ordering::SeqCst);
        self.height.store(geometry.height, Ordering::SeqCst);
        self.seq.store(seq.wrapping_add(2), Ordering::SeqCst);
    }

    /// Reads a consistent geometry snapshot from any thread.
    pub fn load(&self) -> WindowGeometry {
        loop {
            let before = self.seq.load(Ordering::SeqCst);
            if before % 2 != 0 {
                std::hint::spin_loop();
                continue;
            }
            let geometry = WindowGeometry {
                x: self.x.load(Ordering::SeqCst),
                y: self.y.load(Ordering::SeqCst),
                width: self.width.load(Ordering::SeqCst),
                height: self.height.load(Ordering::SeqCst),
            };
            if self.seq.load(Ordering::SeqCst) == before {
                return geometry;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn store_then_load_round_trips() {
        let record = SharedGeometry::new(WindowGeometry::new(10, -20, 800, 600));
        assert_eq!(record.load(), WindowGeometry::new(10, -20, 800, 600));

        record.store(WindowGeometry::new(0, 0, 1920, 1080));
        assert_eq!(record.load(), WindowGeometry::new(0, 0, 1920, 1080));
    }

    #[test]
    fn concurrent_readers_never_see_a_torn_value() {
        let record = Arc::new(SharedGeometry::new(WindowGeometry::new(0, 0, 0, 0)));

        // The writer only ever stores values where all four fields agree, so
        // any mixed read is a torn one.
        let writer = {
            let record = Arc::clone(&record);
            thread::spawn(move || {
                for i in 0..20_000u32 {
                    record.store(WindowGeometry::new(i as i32, i as i32, i, i));
                }
            })
        };

        let readers: Vec<_> = (0..3)
            .map(|_| {
                let record = Arc::clone(&record);
                thread::spawn(move || {
                    for _ in 0..20_000 {
                        let g = record.load();
                        assert_eq!(g.x, g.y);
                        assert_eq!(g.width, g.height);
                        assert_eq!(g.x as u32, g.width);
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
    }
}
