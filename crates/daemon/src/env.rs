// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon binary (spec §6).
//!
//! Every externally-tunable value the orchestrator needs is read through one
//! of these accessors rather than scattered `std::env::var` calls, so the
//! full configuration surface is visible in one file.

use std::path::PathBuf;
use thiserror::Error;
use vu_watchdog_collectors::CollectorConfig;
use vu_watchdog_core::BrokerConfig;

const DEFAULT_DASHBOARD_PORT: u16 = 8787;
const DEFAULT_STUN_SERVER: &str = "stun:stun.l.google.com:19302";
const DEFAULT_CAPTURE_MONITOR: u32 = 0;
const DEFAULT_APP_PROCESS_NAME: &str = "vuos";
const DEFAULT_SERVER_PROCESS_NAME: &str = "vuos-server";
const DEFAULT_INTERNET_PROBE_URL: &str = "https://connectivitycheck.gstatic.com/generate_204";
const DEFAULT_LOCAL_SERVER_URL: &str = "http://127.0.0.1:9000/peers";
const DEFAULT_LOCK_FILE_PATH: &str = "/var/run/vuos/vuos.lock";
const DEFAULT_LOG_FILE_PATH: &str = "/var/log/vuos/vuos.log";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

pub fn wall_id() -> Result<String, ConfigError> {
    required("WD_WALL_ID")
}

/// The two configured brokers (spec §4.1 "two brokers, one active"), read
/// from `WD_BROKER_A_*` / `WD_BROKER_B_*`.
pub fn brokers() -> Result<[BrokerConfig; 2], ConfigError> {
    Ok([broker("A")?, broker("B")?])
}

fn broker(slot: &str) -> Result<BrokerConfig, ConfigError> {
    let url = required(&format!("WD_BROKER_{slot}_URL"))?;
    let mut config = BrokerConfig::new(slot, url);
    if let Some(username) = optional(&format!("WD_BROKER_{slot}_USER")) {
        config = config.username(username);
    }
    if let Some(password) = optional(&format!("WD_BROKER_{slot}_PASS")) {
        config = config.password(password);
    }
    if let Some(label) = optional(&format!("WD_BROKER_{slot}_LABEL")) {
        config = config.label(label);
    }
    Ok(config)
}

/// Local dashboard/health-check port, also used for the single-instance
/// guard (spec §4.8).
pub fn dashboard_port() -> u16 {
    optional("WD_DASHBOARD_PORT")
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_DASHBOARD_PORT)
}

/// Path to the external media engine binary (spec §4.7). Required: streaming
/// commands fail at dispatch time without it, but the daemon itself should
/// not start blind to its absence.
pub fn media_engine_bin() -> Result<String, ConfigError> {
    required("WD_MEDIA_ENGINE_BIN")
}

pub fn stun_server() -> String {
    optional("WD_STUN_SERVER").unwrap_or_else(|| DEFAULT_STUN_SERVER.to_string())
}

pub fn turn_primary_url() -> Option<String> {
    optional("WD_TURN_PRIMARY_URL")
}

pub fn turn_fallback_url() -> Option<String> {
    optional("WD_TURN_FALLBACK_URL")
}

pub fn capture_monitor() -> u32 {
    optional("WD_CAPTURE_MONITOR").and_then(|v| v.parse().ok()).unwrap_or(DEFAULT_CAPTURE_MONITOR)
}

/// Shell commands used to control the target app (spec §4.3 command
/// handlers). Unset commands surface as a `FAILED` ack at dispatch time
/// rather than a startup error, since a host may legitimately only support
/// a subset of lifecycle commands.
pub fn app_start_cmd() -> Option<String> {
    optional("WD_APP_START_CMD")
}

pub fn app_stop_cmd() -> Option<String> {
    optional("WD_APP_STOP_CMD")
}

pub fn app_restart_cmd() -> Option<String> {
    optional("WD_APP_RESTART_CMD")
}

/// Static collector inputs (spec §4.2), handed to
/// [`vu_watchdog_collectors::CollectorRegistry::spawn`] as plain data.
pub fn collector_config() -> CollectorConfig {
    CollectorConfig {
        app_process_name: optional("WD_APP_PROCESS_NAME").unwrap_or_else(|| DEFAULT_APP_PROCESS_NAME.to_string()),
        server_process_name: optional("WD_SERVER_PROCESS_NAME")
            .unwrap_or_else(|| DEFAULT_SERVER_PROCESS_NAME.to_string()),
        internet_probe_url: optional("WD_INTERNET_PROBE_URL")
            .unwrap_or_else(|| DEFAULT_INTERNET_PROBE_URL.to_string()),
        local_server_url: optional("WD_LOCAL_SERVER_URL").unwrap_or_else(|| DEFAULT_LOCAL_SERVER_URL.to_string()),
        lock_file_path: PathBuf::from(optional("WD_LOCK_FILE_PATH").unwrap_or_else(|| DEFAULT_LOCK_FILE_PATH.to_string())),
        log_file_path: PathBuf::from(optional("WD_LOG_FILE_PATH").unwrap_or_else(|| DEFAULT_LOG_FILE_PATH.to_string())),
    }
}

fn required(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::Missing(key.to_string()))
}

fn optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
