// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-instance guard (spec §4.8): probe the local dashboard port before
//! starting the main loop. A response means another instance is already
//! bound to it; this daemon exits rather than fighting it for the broker
//! connection and the target app's process control.

use std::time::Duration;

use thiserror::Error;

const PROBE_TIMEOUT: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum SingleInstanceError {
    #[error("another instance already holds the dashboard port")]
    AlreadyRunning,
}

/// Returns `Ok(())` if the port is free, `Err` if something is already
/// listening on it.
pub async fn check(dashboard_port: u16) -> Result<(), SingleInstanceError> {
    let addr = format!("127.0.0.1:{dashboard_port}");
    match tokio::time::timeout(PROBE_TIMEOUT, tokio::net::TcpStream::connect(&addr)).await {
        Ok(Ok(_stream)) => Err(SingleInstanceError::AlreadyRunning),
        _ => Ok(()),
    }
}

#[cfg(test)]
#[path = "single_instance_tests.rs"]
mod tests;
