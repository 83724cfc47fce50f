// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Health Engine: maps a `TelemetryRecord` to a list of evaluated
//! conditions (spec §4.3). Pure — no I/O, no wall-clock reads; the caller
//! supplies `now_ms` (normally `Clock::epoch_ms()`).

use crate::telemetry::TelemetryRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Severity level of a condition. Total order: `Critical > Degraded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConditionLevel {
    Degraded,
    Critical,
}

/// Fixed set of condition ids evaluated every tick (spec §4.3 table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConditionId {
    #[serde(rename = "VUOS_DOWN")]
    VuosDown,
    #[serde(rename = "SERVER_DOWN")]
    ServerDown,
    #[serde(rename = "DISK_FULL")]
    DiskFull,
    #[serde(rename = "THERMAL_THROTTLING")]
    ThermalThrottling,
    #[serde(rename = "LOCK_STALE")]
    LockStale,
    #[serde(rename = "INTERNET_OFFLINE")]
    InternetOffline,
    #[serde(rename = "LATENCY_HIGH")]
    LatencyHigh,
    #[serde(rename = "DISK_HIGH")]
    DiskHigh,
    #[serde(rename = "GPU_PROBE_FAILED")]
    GpuProbeFailed,
    #[serde(rename = "ERRORS_HIGH")]
    ErrorsHigh,
}

impl ConditionId {
    /// All condition ids, in the fixed order they appear in spec §4.3.
    pub const ALL: [ConditionId; 10] = [
        ConditionId::VuosDown,
        ConditionId::ServerDown,
        ConditionId::DiskFull,
        ConditionId::ThermalThrottling,
        ConditionId::LockStale,
        ConditionId::InternetOffline,
        ConditionId::LatencyHigh,
        ConditionId::DiskHigh,
        ConditionId::GpuProbeFailed,
        ConditionId::ErrorsHigh,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConditionId::VuosDown => "VUOS_DOWN",
            ConditionId::ServerDown => "SERVER_DOWN",
            ConditionId::DiskFull => "DISK_FULL",
            ConditionId::ThermalThrottling => "THERMAL_THROTTLING",
            ConditionId::LockStale => "LOCK_STALE",
            ConditionId::InternetOffline => "INTERNET_OFFLINE",
            ConditionId::LatencyHigh => "LATENCY_HIGH",
            ConditionId::DiskHigh => "DISK_HIGH",
            ConditionId::GpuProbeFailed => "GPU_PROBE_FAILED",
            ConditionId::ErrorsHigh => "ERRORS_HIGH",
        }
    }
}

impl std::fmt::Display for ConditionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static definition of one condition: level, debounce window, predicate.
pub struct ConditionDefinition {
    pub id: ConditionId,
    pub level: ConditionLevel,
    pub debounce_ms: u64,
    pub predicate: fn(&TelemetryRecord) -> bool,
}

/// Diskpercent ≥ 97.0 is `DISK_FULL`; `[90, 97)` is `DISK_HIGH` (boundary
/// behavior, spec §8).
const DISK_FULL_THRESHOLD: f64 = 97.0;
const DISK_HIGH_THRESHOLD: f64 = 90.0;
const LATENCY_HIGH_THRESHOLD_MS: u64 = 250;
const LOCK_STALE_HEARTBEAT_AGE_MS: u64 = 15_000;
const ERRORS_HIGH_THRESHOLD: u32 = 5;

/// The fixed condition set, in the order of spec §4.3.
pub fn condition_definitions() -> Vec<ConditionDefinition> {
    vec![
        ConditionDefinition {
            id: ConditionId::VuosDown,
            level: ConditionLevel::Critical,
            debounce_ms: 10_000,
            predicate: |r| !r.app.app_running,
        },
        ConditionDefinition {
            id: ConditionId::ServerDown,
            level: ConditionLevel::Critical,
            debounce_ms: 10_000,
            predicate: |r| !r.app.server_running,
        },
        ConditionDefinition {
            id: ConditionId::DiskFull,
            level: ConditionLevel::Critical,
            debounce_ms: 0,
            predicate: |r| r.system.disk_percent >= DISK_FULL_THRESHOLD,
        },
        ConditionDefinition {
            id: ConditionId::ThermalThrottling,
            level: ConditionLevel::Critical,
            debounce_ms: 0,
            predicate: |r| r.system.thermal_throttling,
        },
        ConditionDefinition {
            id: ConditionId::LockStale,
            level: ConditionLevel::Critical,
            debounce_ms: 0,
            predicate: |r| {
                !r.app.lock_file.healthy
                    && r.app.lock_file.heartbeat_age_ms.unwrap_or(0) > LOCK_STALE_HEARTBEAT_AGE_MS
            },
        },
        ConditionDefinition {
            id: ConditionId::InternetOffline,
            level: ConditionLevel::Degraded,
            debounce_ms: 30_000,
            predicate: |r| !r.network.internet_reachable,
        },
        ConditionDefinition {
            id: ConditionId::LatencyHigh,
            level: ConditionLevel::Degraded,
            debounce_ms: 60_000,
            // Null latency is treated as 0 (boundary behavior, spec §8): absent
            // measurement never reports high latency.
            predicate: |r| r.network.latency_ms.unwrap_or(0) > LATENCY_HIGH_THRESHOLD_MS,
        },
        ConditionDefinition {
            id: ConditionId::DiskHigh,
            level: ConditionLevel::Degraded,
            debounce_ms: 0,
            predicate: |r| {
                (DISK_HIGH_THRESHOLD..DISK_FULL_THRESHOLD).contains(&r.system.disk_percent)
            },
        },
        ConditionDefinition {
            id: ConditionId::GpuProbeFailed,
            level: ConditionLevel::Degraded,
            // The 60s debounce doubles as the "after warm-up" grace period: a
            // GPU probe that never succeeds only becomes active once it has
            // been absent continuously for the full debounce window.
            debounce_ms: 60_000,
            predicate: |r| r.system.gpu.is_none(),
        },
        ConditionDefinition {
            id: ConditionId::ErrorsHigh,
            level: ConditionLevel::Degraded,
            debounce_ms: 0,
            predicate: |r| r.app.log.recent_count >= ERRORS_HIGH_THRESHOLD,
        },
    ]
}

/// Mutable per-condition state (spec §3 `ConditionState`).
///
/// Invariant: `active ⇒ raw_active ∧ (now − active_since ≥ debounce_ms ∨
/// debounce_ms = 0)`. Invariant: `¬raw_active ⇒ ¬active ∧ active_since = None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConditionState {
    pub raw_active: bool,
    pub active: bool,
    pub active_since: Option<u64>,
}

/// One condition's definition joined with its current state, as returned by
/// `HealthEngine::evaluate`.
#[derive(Debug, Clone, Copy)]
pub struct ConditionEval {
    pub id: ConditionId,
    pub level: ConditionLevel,
    pub state: ConditionState,
}

/// Evaluates the fixed condition set over successive telemetry snapshots,
/// applying per-condition debounce (spec §4.3).
pub struct HealthEngine {
    definitions: Vec<ConditionDefinition>,
    states: HashMap<ConditionId, ConditionState>,
}

impl HealthEngine {
    pub fn new() -> Self {
        Self { definitions: condition_definitions(), states: HashMap::new() }
    }

    /// Evaluate every condition against `record`, advancing debounce state.
    /// Returns one `ConditionEval` per definition, in §4.3 table order.
    pub fn evaluate(&mut self, record: &TelemetryRecord, now_ms: u64) -> Vec<ConditionEval> {
        self.definitions
            .iter()
            .map(|def| {
                let triggered = (def.predicate)(record);
                let state = self.states.entry(def.id).or_default();

                if triggered {
                    if !state.raw_active {
                        state.raw_active = true;
                        state.active_since = Some(now_ms);
                    }
                    let elapsed = state.active_since.map(|since| now_ms.saturating_sub(since));
                    state.active =
                        def.debounce_ms == 0 || elapsed.is_some_and(|e| e >= def.debounce_ms);
                } else {
                    state.raw_active = false;
                    state.active = false;
                    state.active_since = None;
                }

                ConditionEval { id: def.id, level: def.level, state: *state }
            })
            .collect()
    }

    /// Current active-condition ids, sorted lexicographically (spec §4.3
    /// tie-break rule, used for `HealthPayload.conditions`).
    pub fn active_ids(evals: &[ConditionEval]) -> Vec<String> {
        let mut ids: Vec<String> =
            evals.iter().filter(|e| e.state.active).map(|e| e.id.as_str().to_string()).collect();
        ids.sort();
        ids
    }
}

impl Default for HealthEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "health_tests.rs"]
mod tests;
