// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The seam between the Command Processor and the side effects a command
//! actually performs (spec §4.3). A [`CommandContext`] implementation owns
//! no dispatch logic of its own; the processor decides idempotency, TTL
//! freshness, and lease arbitration, then calls exactly one of these
//! methods per accepted command.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use vu_watchdog_core::StreamQualityArgs;

#[derive(Debug, Clone)]
pub struct CommandOutcome {
    pub message: String,
    pub details: Value,
}

impl CommandOutcome {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), details: Value::Null }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    Handler(String),
}

#[async_trait]
pub trait CommandContext: Send + Sync {
    async fn restart_vuos(&mut self, now_ms: u64) -> Result<CommandOutcome, CommandError>;
    async fn start_vuos(&mut self, now_ms: u64) -> Result<CommandOutcome, CommandError>;
    async fn stop_vuos(&mut self, now_ms: u64) -> Result<CommandOutcome, CommandError>;
    async fn quit_watchdog(&mut self, now_ms: u64) -> Result<CommandOutcome, CommandError>;
    async fn switch_broker(&mut self, broker_id: &str, now_ms: u64) -> Result<CommandOutcome, CommandError>;
    async fn request_telemetry(&mut self, now_ms: u64) -> Result<CommandOutcome, CommandError>;
    async fn request_config(&mut self, now_ms: u64) -> Result<CommandOutcome, CommandError>;
    async fn start_stream(
        &mut self,
        monitor: u32,
        quality: StreamQualityArgs,
        now_ms: u64,
    ) -> Result<CommandOutcome, CommandError>;
    async fn stop_stream(&mut self, now_ms: u64) -> Result<CommandOutcome, CommandError>;
    async fn set_stream_quality(
        &mut self,
        quality: StreamQualityArgs,
        now_ms: u64,
    ) -> Result<CommandOutcome, CommandError>;
}
