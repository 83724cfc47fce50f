// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Target-app/server process, lock-file, and log-summary collector (spec
//! §4.2), including crash detection.
//!
//! Crash counting lives here rather than in the Health Engine because it
//! needs the raw PID history between ticks, which the Assembler's
//! stateless `TelemetryRecord` doesn't carry forward. The orchestrator
//! diffs `crash_count_today` between ticks to decide whether to emit a
//! `VUOS_CRASHED` lifecycle event; this collector only maintains the
//! counter.

use crate::registry::{cadence, CollectorHandle};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use sysinfo::System;
use vu_watchdog_core::{AppMetrics, LockFileRecord, LogSummary};

const PROCESS_INTERVAL: Duration = Duration::from_secs(5);
const LOCK_FILE_INTERVAL: Duration = Duration::from_secs(2);
const LOG_INTERVAL: Duration = Duration::from_secs(10);
const LOCK_STALE_HEARTBEAT_AGE_MS: u64 = 15_000;
const LOG_TAIL_LINES: usize = 200;

use crate::config::CollectorConfig;

#[derive(Debug, Deserialize)]
struct LockFileContents {
    pid: u32,
    #[serde(rename = "startTime")]
    start_time: u64,
    #[serde(rename = "lastHeartbeat")]
    last_heartbeat: u64,
}

/// Crash-detection state carried between process-collector ticks.
struct CrashTracker {
    last_pid: Option<u32>,
    crash_count_today: u32,
    reset_date: NaiveDate,
}

impl CrashTracker {
    fn new() -> Self {
        Self { last_pid: None, crash_count_today: 0, reset_date: Local::now().date_naive() }
    }

    /// Returns the current crash count after observing `pid` (the target
    /// app's current PID, if running).
    fn observe(&mut self, pid: Option<u32>) -> u32 {
        let today = Local::now().date_naive();
        if today != self.reset_date {
            self.crash_count_today = 0;
            self.reset_date = today;
        }

        if let Some(pid) = pid {
            if let Some(last) = self.last_pid {
                if last != pid {
                    self.crash_count_today += 1;
                }
            }
            self.last_pid = Some(pid);
        }
        // Disappearance alone is not a crash; `last_pid` is left as-is so
        // the next reappearance with a different PID is detected.

        self.crash_count_today
    }
}

pub async fn run_app_loop(handle: CollectorHandle<AppMetrics>, config: CollectorConfig) {
    let mut sys = System::new_all();
    let mut crash_tracker = CrashTracker::new();

    let mut process_tick = cadence(PROCESS_INTERVAL);
    let mut lock_file_tick = cadence(LOCK_FILE_INTERVAL);
    let mut log_tick = cadence(LOG_INTERVAL);

    loop {
        tokio::select! {
            _ = process_tick.tick() => {
                sys.refresh_processes(sysinfo::ProcessesToUpdate::All, true);
                let app_pid = find_process_pid(&sys, &config.app_process_name);
                let server_running = find_process_pid(&sys, &config.server_process_name).is_some();
                let app_memory_mb = app_pid.and_then(|pid| {
                    sys.process(sysinfo::Pid::from_u32(pid)).map(|p| p.memory() / 1024 / 1024)
                });
                let crash_count_today = crash_tracker.observe(app_pid);
                handle.update(|m| {
                    m.app_running = app_pid.is_some();
                    m.server_running = server_running;
                    m.app_memory_mb = app_memory_mb;
                    m.crash_count_today = crash_count_today;
                });
            }
            _ = lock_file_tick.tick() => {
                let record = read_lock_file(&config.lock_file_path);
                handle.update(|m| m.lock_file = record);
            }
            _ = log_tick.tick() => {
                let summary = read_log_summary(&config.log_file_path);
                handle.update(|m| m.log = summary);
            }
        }
    }
}

fn find_process_pid(sys: &System, name_substring: &str) -> Option<u32> {
    sys.processes()
        .values()
        .find(|p| p.name().to_string_lossy().contains(name_substring))
        .map(|p| p.pid().as_u32())
}

fn read_lock_file(path: &Path) -> LockFileRecord {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return LockFileRecord::absent();
    };
    let Ok(parsed) = serde_json::from_str::<LockFileContents>(&contents) else {
        return LockFileRecord::absent();
    };
    let now_ms = chrono::Utc::now().timestamp_millis().max(0) as u64;
    let heartbeat_age_ms = now_ms.saturating_sub(parsed.last_heartbeat);
    LockFileRecord {
        pid: Some(parsed.pid),
        start_time: Some(parsed.start_time),
        last_heartbeat: Some(parsed.last_heartbeat),
        heartbeat_age_ms: Some(heartbeat_age_ms),
        healthy: heartbeat_age_ms <= LOCK_STALE_HEARTBEAT_AGE_MS,
    }
}

fn read_log_summary(path: &Path) -> LogSummary {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return LogSummary::default();
    };
    let lines: Vec<&str> = contents.lines().rev().take(LOG_TAIL_LINES).collect();
    let recent_count = lines.iter().filter(|line| line.contains("ERROR")).count() as u32;
    let last_message = lines.first().map(|s| s.to_string());
    LogSummary { recent_count, last_message, last_time: None }
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
