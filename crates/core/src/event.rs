// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `EventRecord`: a discrete, human-readable occurrence published on the
//! events topic (spec §4.4). Distinct from the continuous telemetry/health
//! streams — one message per state transition, not per tick.

use serde::{Deserialize, Serialize};

pub const EVENT_SCHEMA: &str = "vu.watchdog.event.v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    #[serde(rename = "info")]
    Info,
    #[serde(rename = "warn")]
    Warn,
    #[serde(rename = "error")]
    Error,
    #[serde(rename = "critical")]
    Critical,
}

crate::simple_display! {
    Severity {
        Info => "info",
        Warn => "warn",
        Error => "error",
        Critical => "critical",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub schema: String,
    #[serde(rename = "ts")]
    pub timestamp: u64,
    #[serde(rename = "wallId")]
    pub wall_id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
}

impl EventRecord {
    pub fn new(
        wall_id: impl Into<String>,
        event_type: impl Into<String>,
        severity: Severity,
        timestamp: u64,
    ) -> Self {
        Self {
            schema: EVENT_SCHEMA.to_string(),
            timestamp,
            wall_id: wall_id.into(),
            event_type: event_type.into(),
            severity,
            details: serde_json::Value::Null,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
