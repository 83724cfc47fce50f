// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Turns condition/mode transitions into `EventRecord`s (spec §4.4).
//!
//! Edge-triggered: one `{id}_ON` on activation, one `{id}_OFF` on clearing,
//! plus a `{id}_REMINDER` every [`REMINDER_INTERVAL_MS`] while a condition
//! stays active, so a long-lived problem doesn't vanish from anyone's
//! scrollback. `emit_lifecycle` covers one-shot markers outside the
//! condition/mode diff (startup, broker switch, shutdown, command receipt).

use crate::event::{EventRecord, Severity};
use crate::health::{ConditionEval, ConditionId, ConditionLevel};
use crate::mode::OperationalMode;
use std::collections::HashMap;

/// How often an active condition re-announces itself.
pub const REMINDER_INTERVAL_MS: u64 = 10 * 60 * 1000;

/// Severity of the `_ON`/`_REMINDER` events for a given condition. Degraded
/// conditions default to `warn`; Critical conditions are always `critical`.
/// `_OFF` is always `info` regardless of level.
fn severity_for(level: ConditionLevel) -> Severity {
    match level {
        ConditionLevel::Critical => Severity::Critical,
        ConditionLevel::Degraded => Severity::Warn,
    }
}

/// Severity for a `MODE_CHANGED` event, keyed by the mode being entered.
fn mode_severity(mode: OperationalMode) -> Severity {
    match mode {
        OperationalMode::Ready | OperationalMode::Starting | OperationalMode::ShuttingDown => {
            Severity::Info
        }
        OperationalMode::Degraded => Severity::Warn,
        OperationalMode::Critical => Severity::Critical,
    }
}

#[derive(Default)]
pub struct EventEmitter {
    previous_active: HashMap<ConditionId, bool>,
    last_reminder: HashMap<ConditionId, u64>,
    previous_mode: Option<OperationalMode>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diff the current condition evals and mode against remembered state,
    /// emitting lifecycle and reminder events. Must be called once per
    /// tick, in tick order — the internal state is only meaningful as a
    /// sequence.
    pub fn process(
        &mut self,
        wall_id: &str,
        evals: &[ConditionEval],
        mode: OperationalMode,
        now_ms: u64,
    ) -> Vec<EventRecord> {
        let mut events = Vec::new();

        for eval in evals {
            let was_active = self.previous_active.get(&eval.id).copied().unwrap_or(false);

            if eval.state.active && !was_active {
                events.push(self.condition_event(wall_id, eval.id, "_ON", severity_for(eval.level), now_ms));
                self.last_reminder.insert(eval.id, now_ms);
            } else if !eval.state.active && was_active {
                events.push(self.condition_event(wall_id, eval.id, "_OFF", Severity::Info, now_ms));
                self.last_reminder.remove(&eval.id);
            } else if eval.state.active && was_active {
                let last = self.last_reminder.get(&eval.id).copied().unwrap_or(now_ms);
                if now_ms.saturating_sub(last) >= REMINDER_INTERVAL_MS {
                    events.push(self.condition_event(
                        wall_id,
                        eval.id,
                        "_REMINDER",
                        severity_for(eval.level),
                        now_ms,
                    ));
                    self.last_reminder.insert(eval.id, now_ms);
                }
            }

            self.previous_active.insert(eval.id, eval.state.active);
        }

        if self.previous_mode != Some(mode) {
            if let Some(from) = self.previous_mode {
                events.push(
                    EventRecord::new(wall_id, "MODE_CHANGED", mode_severity(mode), now_ms).with_details(
                        serde_json::json!({ "from": from.to_string(), "to": mode.to_string() }),
                    ),
                );
            }
            self.previous_mode = Some(mode);
        }

        events
    }

    /// One-shot marker for events outside the condition/mode diff —
    /// startup, broker switch, shutdown, command receipt, crash detection,
    /// explicit restarts.
    pub fn emit_lifecycle(
        &self,
        wall_id: &str,
        event_type: impl Into<String>,
        severity: Severity,
        details: serde_json::Value,
        now_ms: u64,
    ) -> EventRecord {
        EventRecord::new(wall_id, event_type, severity, now_ms).with_details(details)
    }

    fn condition_event(
        &self,
        wall_id: &str,
        id: ConditionId,
        suffix: &str,
        severity: Severity,
        now_ms: u64,
    ) -> EventRecord {
        EventRecord::new(wall_id, format!("{}{suffix}", id.as_str()), severity, now_ms)
            .with_details(serde_json::json!({ "conditionId": id.as_str() }))
    }
}

#[cfg(test)]
#[path = "event_emitter_tests.rs"]
mod tests;
