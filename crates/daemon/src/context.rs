// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Concrete [`CommandContext`](crate::command::CommandContext) wiring real
//! broker, subprocess, and streaming components into command dispatch.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex as AsyncMutex;
use vu_watchdog_adapters::BrokerClient;
use vu_watchdog_core::{BrokerConfig, EventRecord, Severity, StreamQuality, StreamQualityArgs};

use crate::command::{CommandContext, CommandError, CommandOutcome};
use crate::streaming::StreamingManager;

pub struct DaemonContext {
    wall_id: String,
    brokers: Vec<BrokerConfig>,
    active_broker_id: parking_lot::Mutex<String>,
    broker: Arc<AsyncMutex<Box<dyn BrokerClient>>>,
    streaming: Arc<AsyncMutex<StreamingManager>>,
    app_start_cmd: Option<String>,
    app_stop_cmd: Option<String>,
    app_restart_cmd: Option<String>,
    shutdown: Arc<AtomicBool>,
    events_tx: tokio::sync::mpsc::UnboundedSender<EventRecord>,
    events_rx: AsyncMutex<tokio::sync::mpsc::UnboundedReceiver<EventRecord>>,
    force_telemetry: Arc<AtomicBool>,
    force_config: Arc<AtomicBool>,
}

impl DaemonContext {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        wall_id: impl Into<String>,
        brokers: Vec<BrokerConfig>,
        active_broker_id: impl Into<String>,
        broker: Arc<AsyncMutex<Box<dyn BrokerClient>>>,
        streaming: Arc<AsyncMutex<StreamingManager>>,
        app_start_cmd: Option<String>,
        app_stop_cmd: Option<String>,
        app_restart_cmd: Option<String>,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        let (events_tx, events_rx) = tokio::sync::mpsc::unbounded_channel();
        Self {
            wall_id: wall_id.into(),
            brokers,
            active_broker_id: parking_lot::Mutex::new(active_broker_id.into()),
            broker,
            streaming,
            app_start_cmd,
            app_stop_cmd,
            app_restart_cmd,
            shutdown,
            events_tx,
            events_rx: AsyncMutex::new(events_rx),
            force_telemetry: Arc::new(AtomicBool::new(false)),
            force_config: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn shutdown_requested(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    /// Drains a request to republish telemetry/config out of band, queued by
    /// `REQUEST_TELEMETRY`/`REQUEST_CONFIG` (spec §4.6).
    pub fn take_forced_telemetry(&self) -> bool {
        self.force_telemetry.swap(false, Ordering::SeqCst)
    }

    pub fn take_forced_config(&self) -> bool {
        self.force_config.swap(false, Ordering::SeqCst)
    }

    /// Drains events queued by command handling (currently just
    /// `BROKER_SWITCHED`) for the orchestrator to publish alongside its own
    /// tick-driven events.
    pub async fn try_recv_event(&self) -> Option<EventRecord> {
        self.events_rx.lock().await.try_recv().ok()
    }

    async fn run_app_command(&self, cmd: Option<&str>, label: &str) -> Result<CommandOutcome, CommandError> {
        let Some(cmd) = cmd else {
            return Err(CommandError::Handler(format!("no {label} command configured")));
        };
        let status = tokio::process::Command::new("sh")
            .arg("-c")
            .arg(cmd)
            .status()
            .await
            .map_err(|e| CommandError::Handler(e.to_string()))?;
        if status.success() {
            Ok(CommandOutcome::new(format!("{label} command exited successfully")))
        } else {
            Err(CommandError::Handler(format!("{label} command exited with {status}")))
        }
    }
}

#[async_trait]
impl CommandContext for DaemonContext {
    async fn restart_vuos(&mut self, _now_ms: u64) -> Result<CommandOutcome, CommandError> {
        let cmd = self.app_restart_cmd.clone();
        self.run_app_command(cmd.as_deref(), "restart").await
    }

    async fn start_vuos(&mut self, _now_ms: u64) -> Result<CommandOutcome, CommandError> {
        let cmd = self.app_start_cmd.clone();
        self.run_app_command(cmd.as_deref(), "start").await
    }

    async fn stop_vuos(&mut self, _now_ms: u64) -> Result<CommandOutcome, CommandError> {
        let cmd = self.app_stop_cmd.clone();
        self.run_app_command(cmd.as_deref(), "stop").await
    }

    async fn quit_watchdog(&mut self, _now_ms: u64) -> Result<CommandOutcome, CommandError> {
        self.shutdown.store(true, Ordering::SeqCst);
        Ok(CommandOutcome::new("shutting down"))
    }

    async fn switch_broker(&mut self, broker_id: &str, now_ms: u64) -> Result<CommandOutcome, CommandError> {
        let config = self
            .brokers
            .iter()
            .find(|b| b.id == broker_id)
            .cloned()
            .ok_or_else(|| CommandError::Handler(format!("unknown broker id {broker_id}")))?;

        let mut broker = self.broker.lock().await;
        broker
            .switch_broker(&self.wall_id, &config)
            .await
            .map_err(|e| CommandError::Handler(e.to_string()))?;
        drop(broker);

        let from = std::mem::replace(&mut *self.active_broker_id.lock(), config.id.clone());
        let _ = self.events_tx.send(EventRecord::new(
            &self.wall_id,
            "BROKER_SWITCHED",
            Severity::Warn,
            serde_json::json!({ "from": from, "to": config.id }),
            now_ms,
        ));
        Ok(CommandOutcome::new(format!("switched to broker {}", config.id)))
    }

    async fn request_telemetry(&mut self, _now_ms: u64) -> Result<CommandOutcome, CommandError> {
        self.force_telemetry.store(true, Ordering::SeqCst);
        Ok(CommandOutcome::new("telemetry republish queued"))
    }

    async fn request_config(&mut self, _now_ms: u64) -> Result<CommandOutcome, CommandError> {
        self.force_config.store(true, Ordering::SeqCst);
        Ok(CommandOutcome::new("config republish queued"))
    }

    async fn start_stream(
        &mut self,
        monitor: u32,
        quality: StreamQualityArgs,
        now_ms: u64,
    ) -> Result<CommandOutcome, CommandError> {
        let quality =
            StreamQuality { width: quality.width, height: quality.height, fps: quality.fps, bitrate_kbps: quality.bitrate_kbps };
        self.streaming
            .lock()
            .await
            .start(monitor, quality, now_ms)
            .await
            .map(|_| CommandOutcome::new("stream started"))
            .map_err(|e| CommandError::Handler(e.to_string()))
    }

    async fn stop_stream(&mut self, _now_ms: u64) -> Result<CommandOutcome, CommandError> {
        self.streaming.lock().await.stop().await;
        Ok(CommandOutcome::new("stream stopped"))
    }

    async fn set_stream_quality(
        &mut self,
        quality: StreamQualityArgs,
        now_ms: u64,
    ) -> Result<CommandOutcome, CommandError> {
        let quality =
            StreamQuality { width: quality.width, height: quality.height, fps: quality.fps, bitrate_kbps: quality.bitrate_kbps };
        self.streaming
            .lock()
            .await
            .set_quality(quality, now_ms)
            .await
            .map(|_| CommandOutcome::new("stream quality updated"))
            .map_err(|e| CommandError::Handler(e.to_string()))
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
