// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Command Processor entry point (spec §4.6): one [`handle`] call per
//! inbound envelope, whether it arrived over the bus or was synthesized
//! locally by [`local_command`] for a physical-console action.

use std::sync::atomic::{AtomicU64, Ordering};

use vu_watchdog_core::{
    AckEnvelope, AckStatus, CommandEnvelope, CommandType, EventEmitter, EventRecord, LeaseManager, Severity,
};

use super::context::{CommandContext, CommandError, CommandOutcome};

const LOCAL_COMMAND_TTL_MS: u64 = 15_000;
pub const LOCAL_CLIENT_ID: &str = "local-api";

static LOCAL_COMMAND_SEQ: AtomicU64 = AtomicU64::new(0);

/// Wraps a [`CommandType`] originated by the wall itself (physical console,
/// watchdog self-command) into an envelope suitable for [`CommandProcessor::handle`]
/// with `is_local = true`.
pub fn local_command(command: CommandType, now_ms: u64) -> CommandEnvelope {
    let seq = LOCAL_COMMAND_SEQ.fetch_add(1, Ordering::Relaxed);
    let command_id = format!("local-{seq}-{}", nanoid::nanoid!(6));
    CommandEnvelope::new(command_id, command, now_ms).with_ttl(LOCAL_COMMAND_TTL_MS)
}

pub struct HandleOutcome {
    pub acks: Vec<AckEnvelope>,
    pub events: Vec<EventRecord>,
    pub dispatched: bool,
}

pub struct CommandProcessor {
    idempotency: vu_watchdog_core::IdempotencyStore,
}

impl Default for CommandProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandProcessor {
    pub fn new() -> Self {
        Self { idempotency: vu_watchdog_core::IdempotencyStore::new() }
    }

    /// Runs one command through idempotency, freshness, and lease
    /// arbitration, dispatching it to `ctx` only once all three pass.
    #[allow(clippy::too_many_arguments)]
    pub async fn handle(
        &mut self,
        envelope: &CommandEnvelope,
        client_id: &str,
        is_local: bool,
        lease: &mut LeaseManager,
        events: &EventEmitter,
        ctx: &mut dyn CommandContext,
        wall_id: &str,
        now_ms: u64,
    ) -> HandleOutcome {
        let mut acks = Vec::new();
        let mut out_events = vec![events.emit_lifecycle(
            wall_id,
            "COMMAND_RECEIVED",
            Severity::Info,
            serde_json::json!({"commandId": envelope.command_id, "type": envelope.command.type_name()}),
            now_ms,
        )];

        if let Some(cached) = self.idempotency.get(&envelope.command_id, now_ms) {
            acks.push(cached.clone());
            return HandleOutcome { acks, events: out_events, dispatched: false };
        }

        if !envelope.is_fresh(now_ms) {
            let ack = self.settle(
                AckEnvelope::new(&envelope.command_id, AckStatus::Expired, now_ms)
                    .with_message("command ttl expired"),
                now_ms,
            );
            acks.push(ack);
            return HandleOutcome { acks, events: out_events, dispatched: false };
        }

        let requires_lease = envelope.command.requires_lease();
        let bypassed = is_local && envelope.command.local_bypass();

        if requires_lease && !bypassed && !lease.validate(client_id, true, now_ms) {
            let reason = denial_reason(lease, now_ms);
            let ack = self.settle(
                AckEnvelope::new(&envelope.command_id, AckStatus::Rejected, now_ms).with_message(reason),
                now_ms,
            );
            acks.push(ack);
            return HandleOutcome { acks, events: out_events, dispatched: false };
        }

        if requires_lease && bypassed {
            out_events.push(events.emit_lifecycle(
                wall_id,
                "LOCAL_OVERRIDE_USED",
                Severity::Warn,
                serde_json::json!({"commandId": envelope.command_id, "type": envelope.command.type_name()}),
                now_ms,
            ));
        }

        acks.push(AckEnvelope::new(&envelope.command_id, AckStatus::Received, now_ms));

        let terminal = match dispatch(&envelope.command, ctx, now_ms).await {
            Ok(outcome) => {
                let mut ack =
                    AckEnvelope::new(&envelope.command_id, AckStatus::Applied, now_ms).with_message(outcome.message);
                ack.details = outcome.details;
                ack
            }
            Err(err) => AckEnvelope::new(&envelope.command_id, AckStatus::Failed, now_ms).with_message(err.to_string()),
        };
        acks.push(self.settle(terminal, now_ms));

        HandleOutcome { acks, events: out_events, dispatched: true }
    }

    fn settle(&mut self, ack: AckEnvelope, now_ms: u64) -> AckEnvelope {
        self.idempotency.insert(ack.command_id.clone(), ack.clone(), now_ms);
        ack
    }

    pub fn sweep(&mut self, now_ms: u64) {
        self.idempotency.sweep(now_ms);
    }
}

fn denial_reason(lease: &LeaseManager, now_ms: u64) -> String {
    match lease.current() {
        Some(current) if current.is_active(now_ms) => format!("lease held by {}", current.owner),
        _ => "no active lease".to_string(),
    }
}

async fn dispatch(
    command: &CommandType,
    ctx: &mut dyn CommandContext,
    now_ms: u64,
) -> Result<CommandOutcome, CommandError> {
    match command {
        CommandType::RestartVuos => ctx.restart_vuos(now_ms).await,
        CommandType::StartVuos => ctx.start_vuos(now_ms).await,
        CommandType::StopVuos => ctx.stop_vuos(now_ms).await,
        CommandType::QuitWatchdog => ctx.quit_watchdog(now_ms).await,
        CommandType::SwitchBroker { broker_id } => ctx.switch_broker(broker_id, now_ms).await,
        CommandType::RequestTelemetry => ctx.request_telemetry(now_ms).await,
        CommandType::RequestConfig => ctx.request_config(now_ms).await,
        CommandType::StartStream { monitor, quality } => ctx.start_stream(*monitor, *quality, now_ms).await,
        CommandType::StopStream => ctx.stop_stream(now_ms).await,
        CommandType::SetStreamQuality { quality } => ctx.set_stream_quality(*quality, now_ms).await,
    }
}

#[cfg(test)]
#[path = "processor_tests.rs"]
mod tests;
