// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess supervisor for the external media engine (spec §4.7).
//!
//! Spawns the media engine with `tokio::process::Command`, same shape as
//! the teacher's coop supervisor (`daemon/src/adapters/agent/coop/spawn.rs`):
//! spawn, hand the child to a reaper task so it never zombies, then poll an
//! HTTP readiness endpoint with a bounded attempt count. Graceful shutdown
//! sends `SIGTERM` and gives the process a grace period before escalating to
//! `SIGKILL` (spec §5 "Resource discipline").

use crate::error::BridgeError;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid as NixPid;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::Instant;
use vu_watchdog_adapters::MediaEngineClient;
use vu_watchdog_core::{StreamQuality, StreamingState};

/// Candidate HTTP ports probed in order when starting the media engine.
pub const CANDIDATE_PORTS: &[u16] = &[8000, 8001, 8002, 8003, 8080, 8888];

const PORT_RELEASE_WAIT: Duration = Duration::from_secs(2);
const READY_POLL_INTERVAL: Duration = Duration::from_millis(200);
const READY_TIMEOUT: Duration = Duration::from_secs(10);
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// `true` if a TCP listener can bind the port right now (an ephemeral probe,
/// not a reservation — there's an inherent race with the process we're
/// about to start, same as any "find a free port" routine).
async fn port_is_free(port: u16) -> bool {
    tokio::net::TcpListener::bind(("127.0.0.1", port)).await.is_ok()
}

async fn pick_port() -> Result<u16, BridgeError> {
    for &port in CANDIDATE_PORTS {
        if port_is_free(port).await {
            return Ok(port);
        }
    }
    Err(BridgeError::NoFreePort)
}

pub struct MediaProcessSupervisor {
    pid: Option<u32>,
}

impl Default for MediaProcessSupervisor {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaProcessSupervisor {
    pub fn new() -> Self {
        Self { pid: None }
    }

    /// Start the media engine, waiting for it to become ready. Terminates
    /// any instance this supervisor already owns first, per spec ("Before
    /// start, terminate any pre-existing instance and wait 1-2s for ports
    /// to release").
    pub async fn start(
        &mut self,
        state: &mut StreamingState,
        binary_path: &str,
        stun_server: &str,
        monitor: u32,
        quality: StreamQuality,
        now_ms: u64,
    ) -> Result<MediaEngineClient, BridgeError> {
        if self.pid.is_some() {
            self.stop(state).await;
            tokio::time::sleep(PORT_RELEASE_WAIT).await;
        }

        state.mark_starting(monitor, quality);

        let port = pick_port().await?;
        let listen_address = format!("127.0.0.1:{port}");
        let capture_url = format!("screen://{monitor}");

        let mut command = Command::new(binary_path);
        command
            .arg("--listen-address")
            .arg(&listen_address)
            .arg("--stun-server")
            .arg(stun_server)
            .arg("--stream-name")
            .arg("watchdog")
            .arg("--capture-url")
            .arg(&capture_url)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped());

        let child = command.spawn().map_err(|e| BridgeError::ProcessStart(e.to_string()))?;
        let pid = child.id().ok_or_else(|| BridgeError::ProcessStart("child has no pid".to_string()))?;

        spawn_reaper(child.wait_with_output());
        self.pid = Some(pid);

        let base_url = format!("http://{listen_address}");
        let client = MediaEngineClient::new(base_url.clone());
        wait_for_ready(&client).await?;

        let viewer_url = format!("{base_url}/view");
        state.mark_running(pid, port, viewer_url, now_ms);

        Ok(client)
    }

    /// Graceful stop: `SIGTERM`, then up to [`SHUTDOWN_GRACE`] before giving
    /// up waiting (the reaper task still reports the eventual exit).
    pub async fn stop(&mut self, state: &mut StreamingState) {
        if let Some(pid) = self.pid.take() {
            let _ = signal::kill(NixPid::from_raw(pid as i32), Signal::SIGTERM);
            tokio::time::sleep(SHUTDOWN_GRACE).await;
            // Escalate unconditionally after the grace period: a process
            // that already exited just gets an ESRCH, which is fine to
            // ignore here.
            let _ = signal::kill(NixPid::from_raw(pid as i32), Signal::SIGKILL);
        }
        state.mark_stopped();
    }
}

fn spawn_reaper(wait: impl std::future::Future<Output = std::io::Result<std::process::Output>> + Send + 'static) {
    tokio::spawn(async move {
        match wait.await {
            Ok(output) => {
                tracing::warn!(
                    exit_status = %output.status,
                    stderr = %String::from_utf8_lossy(&output.stderr),
                    "media engine process exited"
                );
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to wait on media engine process");
            }
        }
    });
}

async fn wait_for_ready(client: &MediaEngineClient) -> Result<(), BridgeError> {
    let deadline = Instant::now() + READY_TIMEOUT;
    loop {
        if client.get_media_list().await.is_ok() {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(BridgeError::ReadinessTimeout);
        }
        tokio::time::sleep(READY_POLL_INTERVAL).await;
    }
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
