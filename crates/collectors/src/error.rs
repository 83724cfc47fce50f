// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Narrow fallible operations within a single collector tick. Never
//! propagated out of the collector's own loop (spec §7): a failed probe
//! just leaves the cached value in place and logs here.

#[derive(Debug, thiserror::Error)]
pub enum CollectorError {
    #[error("probe failed: {0}")]
    Probe(String),
    #[error("lock file read failed: {0}")]
    LockFile(String),
    #[error("log read failed: {0}")]
    Log(String),
}
