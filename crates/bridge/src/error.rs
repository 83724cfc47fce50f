// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bridge-level failures. Per spec §7, bridge inconsistencies (an answer or
//! ICE candidate from an unknown viewer) are log-and-drop, not errors — this
//! enum only covers failures that abort the operation in progress.

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("media process failed to start: {0}")]
    ProcessStart(String),
    #[error("media process did not become ready within the timeout")]
    ReadinessTimeout,
    #[error("no free port available from the candidate list")]
    NoFreePort,
    #[error("media engine request failed: {0}")]
    MediaEngine(#[from] vu_watchdog_adapters::MediaEngineError),
    #[error("bridge start requires the stream to be running")]
    StreamNotRunning,
}
