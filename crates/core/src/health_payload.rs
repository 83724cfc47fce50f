// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `HealthPayload`: the compact health summary published on the health
//! topic every tick (spec §4.3, §6).

use crate::health::ConditionEval;
use crate::mode::{derive_mode, OperationalMode};
use crate::telemetry::TelemetryRecord;
use serde::{Deserialize, Serialize};

pub const HEALTH_SCHEMA: &str = "vu.watchdog.health.v1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthPayload {
    pub schema: String,
    pub timestamp: u64,
    #[serde(rename = "wallId")]
    pub wall_id: String,
    pub mode: OperationalMode,
    pub conditions: Vec<String>,
    pub summary: HealthSummary,
}

/// Compact rollup of the fields operators actually look at, distinct from
/// the full `TelemetryRecord` published separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSummary {
    pub cpu_percent: f64,
    pub ram_percent: f64,
    pub disk_percent: f64,
    pub internet_reachable: bool,
    pub app_running: bool,
    pub server_running: bool,
}

impl HealthPayload {
    pub fn build(
        record: &TelemetryRecord,
        evals: &[ConditionEval],
        uptime_ms: u64,
        shutting_down: bool,
    ) -> Self {
        let mode = derive_mode(evals, uptime_ms, shutting_down);
        let conditions = crate::health::HealthEngine::active_ids(evals);
        Self {
            schema: HEALTH_SCHEMA.to_string(),
            timestamp: record.timestamp,
            wall_id: record.wall_id.clone(),
            mode,
            conditions,
            summary: HealthSummary {
                cpu_percent: record.system.cpu_percent,
                ram_percent: record.system.ram_percent,
                disk_percent: record.system.disk_percent,
                internet_reachable: record.network.internet_reachable,
                app_running: record.app.app_running,
                server_running: record.app.server_running,
            },
        }
    }
}

#[cfg(test)]
#[path = "health_payload_tests.rs"]
mod tests;
