// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Legacy `control` topic shim (spec §4.6). Frozen: no new action strings
//! are added here going forward, only new [`CommandType`] variants fed by
//! new clients.

use serde::{Deserialize, Serialize};
use vu_watchdog_core::CommandType;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyEnvelope {
    pub action: String,
    #[serde(default)]
    pub args: serde_json::Value,
}

pub fn translate_legacy(envelope: &LegacyEnvelope) -> Option<CommandType> {
    match envelope.action.as_str() {
        "restart" => Some(CommandType::RestartVuos),
        "start" => Some(CommandType::StartVuos),
        "stop" => Some(CommandType::StopVuos),
        "quit" => Some(CommandType::QuitWatchdog),
        "requestTelemetry" => Some(CommandType::RequestTelemetry),
        "requestConfig" => Some(CommandType::RequestConfig),
        _ => None,
    }
}

#[cfg(test)]
#[path = "legacy_tests.rs"]
mod tests;
