// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Broker client: a single logical MQTT connection scoped by `wallId`
//! (spec §4.1). `BrokerClient` is a trait so the daemon can be driven
//! against [`FakeBroker`] in tests without a real broker process — the
//! same fake/real split as `vu_watchdog_core::Clock`.

mod rumqttc_client;
pub mod topics;

#[cfg(any(test, feature = "test-support"))]
mod fake;

pub use rumqttc_client::RumqttcBrokerClient;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeBroker, PublishedMessage};

use async_trait::async_trait;
use vu_watchdog_core::BrokerConfig;

#[derive(Debug, thiserror::Error)]
pub enum BrokerError {
    #[error("broker connect failed: {0}")]
    Connect(String),
    #[error("broker publish failed: {0}")]
    Publish(String),
    #[error("broker subscribe failed: {0}")]
    Subscribe(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Qos {
    AtMostOnce,
    AtLeastOnce,
}

/// An inbound message delivered off a subscribed topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerMessage {
    pub topic: String,
    pub payload: Vec<u8>,
}

/// The fixed set of subscriptions registered on every connect (spec §4.1
/// "Connect").
pub const INBOUND_SUBSCRIPTIONS: &[&str] = &["command/+", "lease", "control", "webrtc/+"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrokerSubscription {
    pub filter: &'static str,
    pub qos: Qos,
}

/// Single logical connection to one of N configured message brokers.
///
/// Implementations never block the caller on a disconnected link: publish
/// on a disconnected client is a silent no-op (spec §4.1 "Failure") —
/// reconnection and LWT delivery are handled by the underlying client.
#[async_trait]
pub trait BrokerClient: Send + Sync {
    /// Establish the connection for `wall_id`: register the Last-Will
    /// (`status = offline`), publish a retained `status = online`, and
    /// subscribe to the fixed inbound topic set.
    async fn connect(&mut self, wall_id: &str, config: &BrokerConfig) -> Result<(), BrokerError>;

    /// Tear down the current connection and reconnect against `config`
    /// (spec §4.1 "Switch"). No synthetic offline publish — LWT semantics
    /// are the contract for the old connection's disappearance.
    async fn switch_broker(&mut self, wall_id: &str, config: &BrokerConfig) -> Result<(), BrokerError>;

    async fn publish(
        &self,
        topic: &str,
        payload: Vec<u8>,
        qos: Qos,
        retain: bool,
    ) -> Result<(), BrokerError>;

    /// Drain the next inbound message, if any, without blocking.
    fn try_recv(&mut self) -> Option<BrokerMessage>;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
