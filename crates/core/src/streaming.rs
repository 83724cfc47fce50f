// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local streaming-subprocess state (spec §4.7), tracked by the orchestrator
//! and reported to viewers requesting `START_STREAM`/`SET_STREAM_QUALITY`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreamStatus {
    #[serde(rename = "stopped")]
    Stopped,
    #[serde(rename = "starting")]
    Starting,
    #[serde(rename = "running")]
    Running,
    #[serde(rename = "error")]
    Error,
}

crate::simple_display! {
    StreamStatus {
        Stopped => "stopped",
        Starting => "starting",
        Running => "running",
        Error => "error",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StreamQuality {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub bitrate_kbps: u32,
}

impl StreamQuality {
    pub fn default_for_monitor() -> Self {
        Self { width: 1920, height: 1080, fps: 30, bitrate_kbps: 4_000 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamingState {
    pub status: StreamStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewer_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub monitor: u32,
    pub quality: StreamQuality,
    /// Whether the underlying media engine binary is installed and
    /// launchable on this host at all.
    pub available: bool,
}

impl StreamingState {
    pub fn stopped(available: bool) -> Self {
        Self {
            status: StreamStatus::Stopped,
            pid: None,
            port: None,
            started_at: None,
            viewer_url: None,
            error: None,
            monitor: 0,
            quality: StreamQuality::default_for_monitor(),
            available,
        }
    }

    pub fn mark_starting(&mut self, monitor: u32, quality: StreamQuality) {
        self.status = StreamStatus::Starting;
        self.monitor = monitor;
        self.quality = quality;
        self.error = None;
    }

    pub fn mark_running(&mut self, pid: u32, port: u16, viewer_url: impl Into<String>, now_ms: u64) {
        self.status = StreamStatus::Running;
        self.pid = Some(pid);
        self.port = Some(port);
        self.started_at = Some(now_ms);
        self.viewer_url = Some(viewer_url.into());
    }

    pub fn mark_error(&mut self, message: impl Into<String>) {
        self.status = StreamStatus::Error;
        self.error = Some(message.into());
    }

    pub fn mark_stopped(&mut self) {
        self.status = StreamStatus::Stopped;
        self.pid = None;
        self.port = None;
        self.started_at = None;
        self.viewer_url = None;
        self.error = None;
    }
}

#[cfg(test)]
#[path = "streaming_tests.rs"]
mod tests;
