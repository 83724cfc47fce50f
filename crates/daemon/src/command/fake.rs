// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory [`CommandContext`] double for exercising [`super::processor::CommandProcessor`]
//! without touching real processes, brokers, or subprocesses.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use vu_watchdog_core::StreamQualityArgs;

use super::context::{CommandContext, CommandError, CommandOutcome};

#[derive(Clone, Default)]
pub struct FakeCommandContext {
    calls: Arc<Mutex<Vec<String>>>,
    fail_next: Arc<Mutex<bool>>,
}

impl FakeCommandContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock poisoned").clone()
    }

    /// The next dispatched command returns an error instead of succeeding.
    pub fn fail_next(&self) {
        *self.fail_next.lock().expect("lock poisoned") = true;
    }

    fn record(&self, call: impl Into<String>) -> Result<CommandOutcome, CommandError> {
        self.calls.lock().expect("lock poisoned").push(call.into());
        let mut fail = self.fail_next.lock().expect("lock poisoned");
        if *fail {
            *fail = false;
            return Err(CommandError::Handler("injected failure".to_string()));
        }
        Ok(CommandOutcome::new("ok"))
    }
}

#[async_trait]
impl CommandContext for FakeCommandContext {
    async fn restart_vuos(&mut self, _now_ms: u64) -> Result<CommandOutcome, CommandError> {
        self.record("restart_vuos")
    }

    async fn start_vuos(&mut self, _now_ms: u64) -> Result<CommandOutcome, CommandError> {
        self.record("start_vuos")
    }

    async fn stop_vuos(&mut self, _now_ms: u64) -> Result<CommandOutcome, CommandError> {
        self.record("stop_vuos")
    }

    async fn quit_watchdog(&mut self, _now_ms: u64) -> Result<CommandOutcome, CommandError> {
        self.record("quit_watchdog")
    }

    async fn switch_broker(&mut self, broker_id: &str, _now_ms: u64) -> Result<CommandOutcome, CommandError> {
        self.record(format!("switch_broker:{broker_id}"))
    }

    async fn request_telemetry(&mut self, _now_ms: u64) -> Result<CommandOutcome, CommandError> {
        self.record("request_telemetry")
    }

    async fn request_config(&mut self, _now_ms: u64) -> Result<CommandOutcome, CommandError> {
        self.record("request_config")
    }

    async fn start_stream(
        &mut self,
        monitor: u32,
        _quality: StreamQualityArgs,
        _now_ms: u64,
    ) -> Result<CommandOutcome, CommandError> {
        self.record(format!("start_stream:{monitor}"))
    }

    async fn stop_stream(&mut self, _now_ms: u64) -> Result<CommandOutcome, CommandError> {
        self.record("stop_stream")
    }

    async fn set_stream_quality(
        &mut self,
        _quality: StreamQualityArgs,
        _now_ms: u64,
    ) -> Result<CommandOutcome, CommandError> {
        self.record("set_stream_quality")
    }
}
