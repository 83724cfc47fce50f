// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Orchestrator (spec §4): the 2-second publish loop plus inbound
//! message routing to the lease, command, legacy, and signaling handlers.
//! Owns nothing the other crates don't already model — this module is
//! wiring, not policy.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, warn};

use vu_watchdog_adapters::broker::topics;
use vu_watchdog_adapters::{BrokerClient, BrokerMessage, Qos};
use vu_watchdog_bridge::{AnswerMessage, CandidateMessage, OutboundSignal, ViewerSignal};
use vu_watchdog_collectors::{Assembler, CollectorRegistry};
use vu_watchdog_core::{
    derive_mode, Clock, CommandEnvelope, CommandType, EventEmitter, EventRecord, HealthEngine, HealthPayload,
    LeaseManager, Severity,
};

use crate::command::processor::LOCAL_CLIENT_ID;
use crate::command::{local_command, translate_legacy, CommandProcessor, LegacyEnvelope};
use crate::context::DaemonContext;
use crate::streaming::StreamingManager;

const TICK_INTERVAL: Duration = Duration::from_secs(2);
const CONFIG_PUBLISH_INTERVAL_MS: u64 = 60_000;
const CONFIG_SCHEMA: &str = "vu.watchdog.config.v1";

/// Shared identity used for commands arriving over the legacy `control`
/// shim, which carries no per-client identity of its own.
const LEGACY_CLIENT_ID: &str = "legacy";

const LEASE_SCHEMA: &str = "vu.watchdog.lease.v1";

#[derive(Debug, Deserialize)]
struct LeaseRequest {
    owner: String,
    #[serde(rename = "expiresTs")]
    expires_ts: u64,
}

#[derive(Debug, Serialize)]
struct LeaseState {
    schema: &'static str,
    ts: u64,
    owner: Option<String>,
    #[serde(rename = "expiresTs")]
    expires_ts: Option<u64>,
}

pub struct Orchestrator<C: Clock> {
    wall_id: String,
    clock: C,
    start_instant: std::time::Instant,
    broker: Arc<AsyncMutex<Box<dyn BrokerClient>>>,
    collectors: CollectorRegistry,
    assembler: Assembler,
    streaming: Arc<AsyncMutex<StreamingManager>>,
    health: HealthEngine,
    events: EventEmitter,
    lease: LeaseManager,
    processor: CommandProcessor,
    ctx: DaemonContext,
    last_crash_count: u32,
    last_config_publish_ms: u64,
    active_broker_id: String,
}

impl<C: Clock> Orchestrator<C> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        wall_id: impl Into<String>,
        clock: C,
        broker: Arc<AsyncMutex<Box<dyn BrokerClient>>>,
        collectors: CollectorRegistry,
        streaming: Arc<AsyncMutex<StreamingManager>>,
        ctx: DaemonContext,
        active_broker_id: impl Into<String>,
    ) -> Self {
        let wall_id = wall_id.into();
        Self {
            assembler: Assembler::new(wall_id.clone()),
            wall_id,
            start_instant: clock.now(),
            clock,
            broker,
            collectors,
            streaming,
            health: HealthEngine::new(),
            events: EventEmitter::new(),
            lease: LeaseManager::new(),
            processor: CommandProcessor::new(),
            ctx,
            last_crash_count: 0,
            last_config_publish_ms: 0,
            active_broker_id: active_broker_id.into(),
        }
    }

    fn uptime_ms(&self) -> u64 {
        self.clock.now().saturating_duration_since(self.start_instant).as_millis() as u64
    }

    /// Runs the main loop until `QUIT_WATCHDOG` sets the shutdown flag.
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(TICK_INTERVAL);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            self.tick().await;
            if self.ctx.shutdown_requested() {
                break;
            }
        }
    }

    /// Drives a single tick directly, bypassing the real-time interval in
    /// [`Orchestrator::run`]. Used by scenario tests that need exact control
    /// over when a tick happens relative to injected inputs and a
    /// [`vu_watchdog_core::FakeClock`].
    #[cfg(any(test, feature = "test-support"))]
    pub async fn tick_for_test(&mut self) {
        self.tick().await;
    }

    async fn tick(&mut self) {
        let now_ms = self.clock.epoch_ms();

        self.drain_inbound(now_ms).await;
        self.drain_outbound_signaling().await;
        self.drain_context_events(now_ms).await;

        self.lease.reap_if_expired(now_ms);
        self.processor.sweep(now_ms);

        let record = self.assembler.assemble(&self.collectors, now_ms);

        if record.app.crash_count_today > self.last_crash_count {
            self.last_crash_count = record.app.crash_count_today;
            let event = self.events.emit_lifecycle(
                &self.wall_id,
                "VUOS_CRASHED",
                Severity::Critical,
                serde_json::json!({ "crashCountToday": record.app.crash_count_today }),
                now_ms,
            );
            self.publish_event(event).await;
        }

        let evals = self.health.evaluate(&record, now_ms);
        let shutting_down = self.ctx.shutdown_requested();
        let uptime_ms = self.uptime_ms();
        let mode = derive_mode(&evals, uptime_ms, shutting_down);

        for event in self.events.process(&self.wall_id, &evals, mode, now_ms) {
            self.publish_event(event).await;
        }

        let health_payload = HealthPayload::build(&record, &evals, uptime_ms, shutting_down);

        self.publish(&topics::telemetry(&self.wall_id), &record, Qos::AtMostOnce, false).await;
        self.publish(&topics::health(&self.wall_id), &health_payload, Qos::AtLeastOnce, true).await;

        self.ctx.take_forced_telemetry();

        let due = now_ms.saturating_sub(self.last_config_publish_ms) >= CONFIG_PUBLISH_INTERVAL_MS;
        if due || self.ctx.take_forced_config() {
            self.publish_config(now_ms).await;
            self.last_config_publish_ms = now_ms;
        }
    }

    async fn publish_config(&self, now_ms: u64) {
        let payload = serde_json::json!({
            "schema": CONFIG_SCHEMA,
            "timestamp": now_ms,
            "wallId": self.wall_id,
            "activeBrokerId": self.active_broker_id,
        });
        self.publish(&topics::config(&self.wall_id), &payload, Qos::AtLeastOnce, true).await;
    }

    async fn publish_event(&self, event: EventRecord) {
        self.publish(&topics::event(&self.wall_id), &event, Qos::AtLeastOnce, false).await;
    }

    async fn publish(&self, topic: &str, payload: &impl Serialize, qos: Qos, retain: bool) {
        let bytes = match serde_json::to_vec(payload) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(topic, error = %err, "failed to encode outbound payload");
                return;
            }
        };
        if let Err(err) = self.broker.lock().await.publish(topic, bytes, qos, retain).await {
            debug!(topic, error = %err, "publish failed");
        }
    }

    /// Drains queued events from command handling (currently just
    /// `BROKER_SWITCHED`), publishing each and keeping the active-broker
    /// tracker used for the config snapshot in sync.
    async fn drain_context_events(&mut self, _now_ms: u64) {
        while let Some(event) = self.ctx.try_recv_event().await {
            if event.event_type == "BROKER_SWITCHED" {
                if let Some(to) = event.details.get("to").and_then(|v| v.as_str()) {
                    self.active_broker_id = to.to_string();
                }
            }
            self.publish_event(event).await;
        }
    }

    async fn drain_outbound_signaling(&mut self) {
        loop {
            let signal = { self.streaming.lock().await.bridge_mut().and_then(|b| b.try_recv_outbound()) };
            let Some(signal) = signal else { break };
            match signal {
                OutboundSignal::Ready(ready) => {
                    self.publish(&topics::webrtc_offer(&self.wall_id), &ready, Qos::AtLeastOnce, true).await;
                }
                OutboundSignal::Offer(offer) => {
                    self.publish(&topics::webrtc_offer(&self.wall_id), &offer, Qos::AtLeastOnce, true).await;
                }
                OutboundSignal::Candidate(candidate) => {
                    self.publish(&topics::webrtc_ice(&self.wall_id), &candidate, Qos::AtLeastOnce, false).await;
                }
                OutboundSignal::ClearRetainedOffer => {
                    self.publish_empty_retained(&topics::webrtc_offer(&self.wall_id)).await;
                }
            }
        }
    }

    async fn publish_empty_retained(&self, topic: &str) {
        if let Err(err) = self.broker.lock().await.publish(topic, Vec::new(), Qos::AtLeastOnce, true).await {
            debug!(topic, error = %err, "failed to clear retained topic");
        }
    }

    async fn drain_inbound(&mut self, now_ms: u64) {
        loop {
            let message = { self.broker.lock().await.try_recv() };
            let Some(message) = message else { break };
            self.route_inbound(message, now_ms).await;
        }
    }

    async fn route_inbound(&mut self, message: BrokerMessage, now_ms: u64) {
        if let Some(client_id) = topics::parse_command_client_id(&self.wall_id, &message.topic) {
            self.handle_command_message(client_id.to_string(), &message.payload, false, now_ms).await;
            return;
        }
        if message.topic == topics::lease(&self.wall_id) {
            self.handle_lease_message(&message.payload, now_ms).await;
            return;
        }
        if message.topic == topics::control(&self.wall_id) {
            self.handle_legacy_message(&message.payload, now_ms).await;
            return;
        }
        if message.topic == topics::webrtc_answer(&self.wall_id) {
            self.handle_answer(&message.payload).await;
            return;
        }
        if message.topic == topics::webrtc_ice(&self.wall_id) {
            self.handle_remote_ice(&message.payload).await;
            return;
        }
        if message.topic == topics::webrtc_join(&self.wall_id) {
            self.handle_join(&message.payload, now_ms).await;
            return;
        }
        if message.topic == topics::webrtc_leave(&self.wall_id) {
            self.handle_leave(&message.payload).await;
            return;
        }
        debug!(topic = %message.topic, "unrecognized inbound topic");
    }

    /// Entry point for commands originated on this host rather than over the
    /// bus (physical console, local tray action). The out-of-scope dashboard
    /// surface is the intended caller; this is its seam into the lease/ack
    /// pipeline, dispatched under [`LOCAL_CLIENT_ID`] with `is_local = true`
    /// so lease-gated commands take the local-bypass path.
    pub async fn submit_local(&mut self, command: CommandType, now_ms: u64) {
        let envelope = local_command(command, now_ms);
        self.process_command(&envelope, LOCAL_CLIENT_ID, true, now_ms).await;
    }

    async fn handle_command_message(&mut self, client_id: String, payload: &[u8], is_local: bool, now_ms: u64) {
        let envelope: CommandEnvelope = match serde_json::from_slice(payload) {
            Ok(envelope) => envelope,
            Err(err) => {
                warn!(error = %err, "malformed command envelope, dropping");
                return;
            }
        };
        self.process_command(&envelope, &client_id, is_local, now_ms).await;
    }

    async fn process_command(&mut self, envelope: &CommandEnvelope, client_id: &str, is_local: bool, now_ms: u64) {
        let outcome = self
            .processor
            .handle(envelope, client_id, is_local, &mut self.lease, &self.events, &mut self.ctx, &self.wall_id, now_ms)
            .await;

        for event in outcome.events {
            self.publish_event(event).await;
        }
        for ack in outcome.acks {
            self.publish(&topics::ack(&self.wall_id, client_id), &ack, Qos::AtLeastOnce, false).await;
        }
    }

    async fn handle_lease_message(&mut self, payload: &[u8], now_ms: u64) {
        let request: LeaseRequest = match serde_json::from_slice(payload) {
            Ok(request) => request,
            Err(err) => {
                warn!(error = %err, "malformed lease request, dropping");
                return;
            }
        };
        self.lease.acquire_with_expiry(request.owner, request.expires_ts, now_ms);
        let state = LeaseState {
            schema: LEASE_SCHEMA,
            ts: now_ms,
            owner: self.lease.current().map(|l| l.owner.clone()),
            expires_ts: self.lease.current().map(|l| l.expires_ts),
        };
        self.publish(&topics::lease(&self.wall_id), &state, Qos::AtLeastOnce, true).await;
    }

    async fn handle_legacy_message(&mut self, payload: &[u8], now_ms: u64) {
        let legacy: LegacyEnvelope = match serde_json::from_slice(payload) {
            Ok(legacy) => legacy,
            Err(err) => {
                warn!(error = %err, "malformed legacy control message, dropping");
                return;
            }
        };
        let Some(command) = translate_legacy(&legacy) else {
            debug!(action = %legacy.action, "unrecognized legacy action, dropping");
            return;
        };
        let envelope = local_command(command, now_ms);
        self.process_command(&envelope, LEGACY_CLIENT_ID, false, now_ms).await;
    }

    async fn handle_answer(&mut self, payload: &[u8]) {
        let answer: AnswerMessage = match serde_json::from_slice(payload) {
            Ok(answer) => answer,
            Err(err) => {
                warn!(error = %err, "malformed answer message, dropping");
                return;
            }
        };
        let mut streaming = self.streaming.lock().await;
        if let Some(bridge) = streaming.bridge_mut() {
            if let Err(err) = bridge.answer(&answer).await {
                warn!(error = %err, "failed to apply viewer answer");
            }
        }
    }

    async fn handle_remote_ice(&mut self, payload: &[u8]) {
        let candidate: CandidateMessage = match serde_json::from_slice(payload) {
            Ok(candidate) => candidate,
            Err(err) => {
                warn!(error = %err, "malformed ice candidate, dropping");
                return;
            }
        };
        let mut streaming = self.streaming.lock().await;
        if let Some(bridge) = streaming.bridge_mut() {
            if let Err(err) = bridge.remote_ice(&candidate).await {
                warn!(error = %err, "failed to forward remote ice candidate");
            }
        }
    }

    async fn handle_join(&mut self, payload: &[u8], now_ms: u64) {
        let signal: ViewerSignal = match serde_json::from_slice(payload) {
            Ok(signal) => signal,
            Err(err) => {
                warn!(error = %err, "malformed join signal, dropping");
                return;
            }
        };
        let mut streaming = self.streaming.lock().await;
        let Some(bridge) = streaming.bridge_mut() else {
            debug!(viewer_id = %signal.from, "join received with no stream running, dropping");
            return;
        };
        if let Err(err) = bridge.join(&signal.from, now_ms).await {
            warn!(viewer_id = %signal.from, error = %err, "viewer join failed");
        }
    }

    async fn handle_leave(&mut self, payload: &[u8]) {
        let signal: ViewerSignal = match serde_json::from_slice(payload) {
            Ok(signal) => signal,
            Err(err) => {
                warn!(error = %err, "malformed leave signal, dropping");
                return;
            }
        };
        let mut streaming = self.streaming.lock().await;
        if let Some(bridge) = streaming.bridge_mut() {
            bridge.leave(&signal.from).await;
        }
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
