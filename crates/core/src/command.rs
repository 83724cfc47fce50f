// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command and acknowledgment envelopes (spec §4.5, §4.6, REDESIGN FLAGS).
//!
//! The original spec's `args: Record<string, any>` is replaced here with a
//! tagged `CommandType` enum — every command's argument shape is checked at
//! deserialization time instead of at the point of use.

use serde::{Deserialize, Serialize};

pub const COMMAND_SCHEMA: &str = "vu.watchdog.command.v1";
pub const ACK_SCHEMA: &str = "vu.watchdog.ack.v1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CommandType {
    #[serde(rename = "RESTART_VUOS")]
    RestartVuos,
    #[serde(rename = "START_VUOS")]
    StartVuos,
    #[serde(rename = "STOP_VUOS")]
    StopVuos,
    #[serde(rename = "QUIT_WATCHDOG")]
    QuitWatchdog,
    #[serde(rename = "SWITCH_BROKER")]
    SwitchBroker { broker_id: String },
    #[serde(rename = "REQUEST_TELEMETRY")]
    RequestTelemetry,
    #[serde(rename = "REQUEST_CONFIG")]
    RequestConfig,
    #[serde(rename = "START_STREAM")]
    StartStream { monitor: u32, quality: StreamQualityArgs },
    #[serde(rename = "STOP_STREAM")]
    StopStream,
    #[serde(rename = "SET_STREAM_QUALITY")]
    SetStreamQuality { quality: StreamQualityArgs },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StreamQualityArgs {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub bitrate_kbps: u32,
}

impl CommandType {
    /// Commands that change device lifecycle state require an active lease
    /// held by the command's origin (spec §4.5, §4.6); queries and
    /// streaming commands do not.
    pub fn requires_lease(&self) -> bool {
        matches!(
            self,
            CommandType::RestartVuos
                | CommandType::StartVuos
                | CommandType::StopVuos
                | CommandType::QuitWatchdog
                | CommandType::SwitchBroker { .. }
        )
    }

    /// Commands originated locally (physical console, not the bus) may
    /// bypass lease validation entirely — except re-homing to a different
    /// broker, which always requires remote authorization since it can
    /// strand the wall off the fleet's bus.
    pub fn local_bypass(&self) -> bool {
        !matches!(self, CommandType::SwitchBroker { .. })
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            CommandType::RestartVuos => "RESTART_VUOS",
            CommandType::StartVuos => "START_VUOS",
            CommandType::StopVuos => "STOP_VUOS",
            CommandType::QuitWatchdog => "QUIT_WATCHDOG",
            CommandType::SwitchBroker { .. } => "SWITCH_BROKER",
            CommandType::RequestTelemetry => "REQUEST_TELEMETRY",
            CommandType::RequestConfig => "REQUEST_CONFIG",
            CommandType::StartStream { .. } => "START_STREAM",
            CommandType::StopStream => "STOP_STREAM",
            CommandType::SetStreamQuality { .. } => "SET_STREAM_QUALITY",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandEnvelope {
    pub schema: String,
    #[serde(rename = "ts")]
    pub timestamp: u64,
    #[serde(rename = "commandId")]
    pub command_id: String,
    #[serde(rename = "ttlMs", default, skip_serializing_if = "Option::is_none")]
    pub ttl_ms: Option<u64>,
    #[serde(flatten)]
    pub command: CommandType,
}

impl CommandEnvelope {
    pub fn new(command_id: impl Into<String>, command: CommandType, timestamp: u64) -> Self {
        Self {
            schema: COMMAND_SCHEMA.to_string(),
            timestamp,
            command_id: command_id.into(),
            ttl_ms: None,
            command,
        }
    }

    pub fn with_ttl(mut self, ttl_ms: u64) -> Self {
        self.ttl_ms = Some(ttl_ms);
        self
    }

    /// Whether this envelope is still within its TTL window, if it has one.
    /// A command expires the instant `now >= ts + ttl`, so `ttlMs = 0` is
    /// expired as of its own timestamp.
    pub fn is_fresh(&self, now_ms: u64) -> bool {
        match self.ttl_ms {
            Some(ttl) => now_ms < self.timestamp.saturating_add(ttl),
            None => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AckStatus {
    #[serde(rename = "received")]
    Received,
    #[serde(rename = "applied")]
    Applied,
    #[serde(rename = "rejected")]
    Rejected,
    #[serde(rename = "failed")]
    Failed,
    #[serde(rename = "expired")]
    Expired,
}

crate::simple_display! {
    AckStatus {
        Received => "received",
        Applied => "applied",
        Rejected => "rejected",
        Failed => "failed",
        Expired => "expired",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AckEnvelope {
    pub schema: String,
    #[serde(rename = "ts")]
    pub timestamp: u64,
    #[serde(rename = "commandId")]
    pub command_id: String,
    pub status: AckStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
}

impl AckEnvelope {
    pub fn new(command_id: impl Into<String>, status: AckStatus, timestamp: u64) -> Self {
        Self {
            schema: ACK_SCHEMA.to_string(),
            timestamp,
            command_id: command_id.into(),
            status,
            message: None,
            details: serde_json::Value::Null,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
