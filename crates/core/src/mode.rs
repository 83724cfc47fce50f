// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operational mode: a pure function of the active condition set plus
//! shutdown/uptime flags (spec §4.3). Computed fresh every tick — never
//! stored as mutable state of its own.

use crate::health::{ConditionEval, ConditionLevel};
use serde::{Deserialize, Serialize};

/// Minimum uptime before the daemon leaves `STARTING`.
pub const STARTUP_GRACE_MS: u64 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationalMode {
    #[serde(rename = "STARTING")]
    Starting,
    #[serde(rename = "READY")]
    Ready,
    #[serde(rename = "DEGRADED")]
    Degraded,
    #[serde(rename = "CRITICAL")]
    Critical,
    #[serde(rename = "SHUTTING_DOWN")]
    ShuttingDown,
}

crate::simple_display! {
    OperationalMode {
        Starting => "STARTING",
        Ready => "READY",
        Degraded => "DEGRADED",
        Critical => "CRITICAL",
        ShuttingDown => "SHUTTING_DOWN",
    }
}

/// Derive the operational mode from current condition evals, in priority
/// order: shutdown > startup grace > critical > degraded > ready.
pub fn derive_mode(evals: &[ConditionEval], uptime_ms: u64, shutting_down: bool) -> OperationalMode {
    if shutting_down {
        return OperationalMode::ShuttingDown;
    }
    if uptime_ms < STARTUP_GRACE_MS {
        return OperationalMode::Starting;
    }
    if evals.iter().any(|e| e.state.active && e.level == ConditionLevel::Critical) {
        return OperationalMode::Critical;
    }
    if evals.iter().any(|e| e.state.active && e.level == ConditionLevel::Degraded) {
        return OperationalMode::Degraded;
    }
    OperationalMode::Ready
}

#[cfg(test)]
#[path = "mode_tests.rs"]
mod tests;
