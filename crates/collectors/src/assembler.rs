// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot Assembler (spec §4.2): on each 2-second tick, reads the current
//! cached value from every collector and composes a `TelemetryRecord`. No
//! I/O happens here — every value is already sitting in a cache cell.

use crate::registry::CollectorRegistry;
use vu_watchdog_core::{NetworkMetrics, TelemetryRecord};

pub struct Assembler {
    wall_id: String,
}

impl Assembler {
    pub fn new(wall_id: impl Into<String>) -> Self {
        Self { wall_id: wall_id.into() }
    }

    /// Compose one `TelemetryRecord` from the registry's current cache
    /// state. `now_ms` is the tick timestamp, supplied by the caller so
    /// this stays a pure read.
    pub fn assemble(&self, registry: &CollectorRegistry, now_ms: u64) -> TelemetryRecord {
        let mut system = registry.system.get();
        system.gpu = registry.gpu.get();

        let network: NetworkMetrics = registry.network.get();
        let app = registry.app.get();

        TelemetryRecord {
            timestamp: now_ms,
            wall_id: self.wall_id.clone(),
            system,
            network,
            app,
        }
    }
}

#[cfg(test)]
#[path = "assembler_tests.rs"]
mod tests;
