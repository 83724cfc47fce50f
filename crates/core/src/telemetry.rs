// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `TelemetryRecord` and its nested system/network/app fields (spec §3).
//!
//! Produced once per 2s tick by the Snapshot Assembler from collector
//! caches; consumed once by the Health Engine and the telemetry publish
//! path. No component holds onto a `TelemetryRecord` past the tick that
//! produced it other than the "most recently published" reference kept by
//! the orchestrator for local-observer broadcast.

use serde::{Deserialize, Serialize};

/// A single 2-second telemetry snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    pub timestamp: u64,
    #[serde(rename = "wallId")]
    pub wall_id: String,
    pub system: SystemMetrics,
    pub network: NetworkMetrics,
    pub app: AppMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemMetrics {
    pub cpu_percent: f64,
    pub cpu_model: String,
    pub cpu_cores: u32,
    pub ram_total_mb: u64,
    pub ram_used_mb: u64,
    pub ram_percent: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu: Option<GpuMetrics>,
    pub disk_total_gb: f64,
    pub disk_used_gb: f64,
    pub disk_percent: f64,
    pub disk_read_mb_s: f64,
    pub disk_write_mb_s: f64,
    pub thermal_throttling: bool,
    pub pending_updates: u32,
    pub recent_event_log: LogSummary,
    pub uptime_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpuMetrics {
    pub name: String,
    pub usage_percent: f64,
    pub vram_used_mb: u64,
    pub vram_total_mb: u64,
    pub temperature_c: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkMetrics {
    pub internet_reachable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    pub local_server_reachable: bool,
    pub connected_peer_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppMetrics {
    pub app_running: bool,
    pub server_running: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_memory_mb: Option<u64>,
    pub crash_count_today: u32,
    pub lock_file: LockFileRecord,
    pub log: LogSummary,
}

/// Lock-file heartbeat record used by `LOCK_STALE` (spec §4.3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockFileRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_heartbeat: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heartbeat_age_ms: Option<u64>,
    pub healthy: bool,
}

impl LockFileRecord {
    pub fn absent() -> Self {
        Self { pid: None, start_time: None, last_heartbeat: None, heartbeat_age_ms: None, healthy: true }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogSummary {
    pub recent_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_time: Option<u64>,
}

impl SystemMetrics {
    /// Pre-first-probe placeholder: zeroed values, no GPU, nothing active.
    /// Collectors overwrite this the moment their first successful sample
    /// lands; it only shows up in a `TelemetryRecord` during the startup
    /// grace window (spec §4.3 `STARTING`).
    pub fn baseline() -> Self {
        Self {
            cpu_percent: 0.0,
            cpu_model: String::new(),
            cpu_cores: 0,
            ram_total_mb: 0,
            ram_used_mb: 0,
            ram_percent: 0.0,
            gpu: None,
            disk_total_gb: 0.0,
            disk_used_gb: 0.0,
            disk_percent: 0.0,
            disk_read_mb_s: 0.0,
            disk_write_mb_s: 0.0,
            thermal_throttling: false,
            pending_updates: 0,
            recent_event_log: LogSummary::default(),
            uptime_secs: 0,
        }
    }
}

impl NetworkMetrics {
    /// Pre-first-probe placeholder. Conservative: reachability defaults to
    /// `false` rather than assuming connectivity that hasn't been observed.
    pub fn baseline() -> Self {
        Self { internet_reachable: false, latency_ms: None, local_server_reachable: false, connected_peer_count: 0 }
    }
}

impl AppMetrics {
    /// Pre-first-probe placeholder. `app_running`/`server_running` default
    /// to `false` so a daemon that dies before its first process scan
    /// still reports `VUOS_DOWN` rather than a false-healthy gap.
    pub fn baseline() -> Self {
        Self {
            app_running: false,
            server_running: false,
            server_version: None,
            app_memory_mb: None,
            crash_count_today: 0,
            lock_file: LockFileRecord::absent(),
            log: LogSummary::default(),
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
crate::builder! {
    pub struct TelemetryRecordBuilder => TelemetryRecord {
        into { wall_id: String = "wall-1" }
        set {
            timestamp: u64 = 0,
            system: SystemMetrics = SystemMetrics::nominal(),
            network: NetworkMetrics = NetworkMetrics::nominal(),
            app: AppMetrics = AppMetrics::nominal(),
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
impl SystemMetrics {
    /// A healthy baseline snapshot, for test fixtures.
    pub fn nominal() -> Self {
        Self {
            cpu_percent: 10.0,
            cpu_model: "Test CPU".to_string(),
            cpu_cores: 8,
            ram_total_mb: 16_384,
            ram_used_mb: 4_096,
            ram_percent: 25.0,
            gpu: Some(GpuMetrics {
                name: "Test GPU".to_string(),
                usage_percent: 5.0,
                vram_used_mb: 512,
                vram_total_mb: 8_192,
                temperature_c: 45.0,
            }),
            disk_total_gb: 512.0,
            disk_used_gb: 100.0,
            disk_percent: 19.5,
            disk_read_mb_s: 1.0,
            disk_write_mb_s: 1.0,
            thermal_throttling: false,
            pending_updates: 0,
            recent_event_log: LogSummary::default(),
            uptime_secs: 3600,
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
impl NetworkMetrics {
    pub fn nominal() -> Self {
        Self {
            internet_reachable: true,
            latency_ms: Some(20),
            local_server_reachable: true,
            connected_peer_count: 1,
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
impl AppMetrics {
    pub fn nominal() -> Self {
        Self {
            app_running: true,
            server_running: true,
            server_version: Some("1.0.0".to_string()),
            app_memory_mb: Some(256),
            crash_count_today: 0,
            lock_file: LockFileRecord {
                pid: Some(1000),
                start_time: Some(0),
                last_heartbeat: Some(0),
                heartbeat_age_ms: Some(0),
                healthy: true,
            },
            log: LogSummary::default(),
        }
    }
}

#[cfg(test)]
#[path = "telemetry_tests.rs"]
mod tests;
