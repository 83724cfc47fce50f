// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `BrokerClient` backed by `rumqttc` (spec §4.1). One `AsyncClient` +
//! `EventLoop` pair per connection; the event loop is driven by a background
//! task that forwards inbound publishes into an unbounded channel and
//! re-subscribes on every `ConnAck` — a broker may forget our session even
//! under a persistent one, so re-subscribing is cheap insurance taken on
//! every reconnect, not just the first connect.

use super::topics;
use super::{BrokerClient, BrokerError, BrokerMessage, Qos};
use async_trait::async_trait;
use rumqttc::{AsyncClient, Event, LastWill, MqttOptions, Packet, QoS as RumqttcQos};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use vu_watchdog_core::BrokerConfig;

/// MQTT keep-alive interval.
const KEEP_ALIVE: Duration = Duration::from_secs(30);
/// Capacity of the internal rumqttc request channel.
const CLIENT_CAP: usize = 50;

fn to_rumqttc_qos(qos: Qos) -> RumqttcQos {
    match qos {
        Qos::AtMostOnce => RumqttcQos::AtMostOnce,
        Qos::AtLeastOnce => RumqttcQos::AtLeastOnce,
    }
}

/// Split a `host:port` (optionally `mqtt://host:port`) server URL. Falls
/// back to the standard unencrypted MQTT port when none is given.
fn parse_server_url(server_url: &str) -> (String, u16) {
    let stripped =
        server_url.strip_prefix("mqtt://").or_else(|| server_url.strip_prefix("tcp://")).unwrap_or(server_url);
    match stripped.rsplit_once(':') {
        Some((host, port)) => (host.to_string(), port.parse().unwrap_or(1883)),
        None => (stripped.to_string(), 1883),
    }
}

pub struct RumqttcBrokerClient {
    client: Option<AsyncClient>,
    inbound_rx: Option<mpsc::UnboundedReceiver<BrokerMessage>>,
    poll_task: Option<JoinHandle<()>>,
}

impl Default for RumqttcBrokerClient {
    fn default() -> Self {
        Self::new()
    }
}

impl RumqttcBrokerClient {
    pub fn new() -> Self {
        Self { client: None, inbound_rx: None, poll_task: None }
    }

    async fn connect_internal(
        &mut self,
        wall_id: &str,
        config: &BrokerConfig,
    ) -> Result<(), BrokerError> {
        let (host, port) = parse_server_url(&config.server_url);
        let client_id = format!("watchdog-{wall_id}");
        let mut opts = MqttOptions::new(client_id, host, port);
        opts.set_keep_alive(KEEP_ALIVE);
        if !config.username.is_empty() {
            opts.set_credentials(config.username.clone(), config.password.clone());
        }

        let status_topic = topics::status(wall_id);
        let offline_payload = serde_json::json!({
            "status": "offline",
            "wallId": wall_id,
        })
        .to_string();
        opts.set_last_will(LastWill::new(
            &status_topic,
            offline_payload.into_bytes(),
            RumqttcQos::AtLeastOnce,
            true,
        ));

        let (client, eventloop) = AsyncClient::new(opts, CLIENT_CAP);

        for filter in subscription_filters(wall_id) {
            client
                .subscribe(&filter, RumqttcQos::AtLeastOnce)
                .await
                .map_err(|e| BrokerError::Subscribe(e.to_string()))?;
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let task_wall_id = wall_id.to_string();
        let task_client = client.clone();
        let poll_task = tokio::spawn(async move {
            poll_loop(eventloop, tx, task_client, task_wall_id).await;
        });

        let online_payload = serde_json::json!({
            "status": "online",
            "wallId": wall_id,
        })
        .to_string();
        let _ = client
            .publish(&status_topic, RumqttcQos::AtLeastOnce, true, online_payload.into_bytes())
            .await;

        self.client = Some(client);
        self.inbound_rx = Some(rx);
        self.poll_task = Some(poll_task);
        Ok(())
    }
}

/// Background event-loop driver. Forwards inbound publishes to `tx` and
/// re-subscribes the fixed inbound set on every `ConnAck` (spec §4.1
/// "Connect"). Exits when the event loop or channel closes.
async fn poll_loop(
    mut eventloop: rumqttc::EventLoop,
    tx: mpsc::UnboundedSender<BrokerMessage>,
    client: AsyncClient,
    wall_id: String,
) {
    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                let msg = BrokerMessage { topic: publish.topic, payload: publish.payload.to_vec() };
                if tx.send(msg).is_err() {
                    return;
                }
            }
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                tracing::info!(wall_id = %wall_id, "broker connected");
                for filter in subscription_filters(&wall_id) {
                    if let Err(e) = client.subscribe(&filter, RumqttcQos::AtLeastOnce).await {
                        tracing::error!(wall_id = %wall_id, filter = %filter, error = %e, "re-subscribe failed");
                    }
                }
            }
            Ok(Event::Incoming(Packet::Disconnect)) => {
                tracing::warn!(wall_id = %wall_id, "broker disconnected");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(wall_id = %wall_id, error = %e, "broker event loop error");
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
        }
    }
}

fn subscription_filters(wall_id: &str) -> Vec<String> {
    vec![
        topics::command_filter(wall_id),
        topics::lease(wall_id),
        topics::control(wall_id),
        format!("watchdog/{wall_id}/webrtc/+"),
    ]
}

#[async_trait]
impl BrokerClient for RumqttcBrokerClient {
    async fn connect(&mut self, wall_id: &str, config: &BrokerConfig) -> Result<(), BrokerError> {
        self.connect_internal(wall_id, config).await
    }

    async fn switch_broker(
        &mut self,
        wall_id: &str,
        config: &BrokerConfig,
    ) -> Result<(), BrokerError> {
        // No synthetic offline publish on the old connection — LWT semantics
        // are the contract for its disappearance (spec §4.1 "Switch").
        if let Some(task) = self.poll_task.take() {
            task.abort();
        }
        if let Some(client) = self.client.take() {
            let _ = client.disconnect().await;
        }
        self.inbound_rx = None;
        self.connect_internal(wall_id, config).await
    }

    async fn publish(
        &self,
        topic: &str,
        payload: Vec<u8>,
        qos: Qos,
        retain: bool,
    ) -> Result<(), BrokerError> {
        // Publishes on a disconnected client are silent no-ops (spec §4.1
        // "Failure") — prevents tight-loop error fanout while reconnecting.
        let Some(client) = &self.client else {
            return Ok(());
        };
        if let Err(e) = client.publish(topic, to_rumqttc_qos(qos), retain, payload).await {
            tracing::debug!(topic = %topic, error = %e, "publish failed");
        }
        Ok(())
    }

    fn try_recv(&mut self) -> Option<BrokerMessage> {
        self.inbound_rx.as_mut().and_then(|rx| rx.try_recv().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_server_url_strips_scheme_and_parses_port() {
        assert_eq!(parse_server_url("mqtt://broker.local:1883"), ("broker.local".to_string(), 1883));
        assert_eq!(parse_server_url("broker.local:8883"), ("broker.local".to_string(), 8883));
    }

    #[test]
    fn parse_server_url_defaults_port_when_absent() {
        assert_eq!(parse_server_url("broker.local"), ("broker.local".to_string(), 1883));
    }

    #[test]
    fn subscription_filters_are_scoped_by_wall_id() {
        let filters = subscription_filters("wall-1");
        assert!(filters.contains(&"watchdog/wall-1/command/+".to_string()));
        assert!(filters.contains(&"watchdog/wall-1/lease".to_string()));
        assert!(filters.contains(&"watchdog/wall-1/control".to_string()));
        assert!(filters.contains(&"watchdog/wall-1/webrtc/+".to_string()));
    }
}
