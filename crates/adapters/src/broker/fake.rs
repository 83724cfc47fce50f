// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory `BrokerClient` for tests — records every publish and lets the
//! test drive inbound messages directly, mirroring `vu_watchdog_core`'s
//! `FakeClock` fake/real split.

use super::{BrokerClient, BrokerError, BrokerMessage, Qos};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use vu_watchdog_core::BrokerConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct PublishedMessage {
    pub topic: String,
    pub payload: Vec<u8>,
    pub qos: Qos,
    pub retain: bool,
}

#[derive(Default)]
struct Inner {
    connected: bool,
    active_broker_id: Option<String>,
    published: Vec<PublishedMessage>,
    inbound: VecDeque<BrokerMessage>,
    switch_log: Vec<(Option<String>, String)>,
}

/// Shared, clonable fake broker. Clone to hand a handle to the test while
/// keeping another to drive the daemon under test — both see the same
/// state.
#[derive(Clone, Default)]
pub struct FakeBroker {
    inner: Arc<Mutex<Inner>>,
}

impl FakeBroker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_connected(&self) -> bool {
        self.inner.lock().connected
    }

    pub fn active_broker_id(&self) -> Option<String> {
        self.inner.lock().active_broker_id.clone()
    }

    pub fn published(&self) -> Vec<PublishedMessage> {
        self.inner.lock().published.clone()
    }

    pub fn published_on(&self, topic: &str) -> Vec<PublishedMessage> {
        self.inner.lock().published.iter().filter(|m| m.topic == topic).cloned().collect()
    }

    pub fn switch_log(&self) -> Vec<(Option<String>, String)> {
        self.inner.lock().switch_log.clone()
    }

    /// Push an inbound message as if it arrived off the wire; the next
    /// `try_recv` call returns it.
    pub fn push_inbound(&self, topic: impl Into<String>, payload: impl Into<Vec<u8>>) {
        self.inner.lock().inbound.push_back(BrokerMessage { topic: topic.into(), payload: payload.into() });
    }

    pub fn clear_published(&self) {
        self.inner.lock().published.clear();
    }
}

#[async_trait]
impl BrokerClient for FakeBroker {
    async fn connect(&mut self, _wall_id: &str, config: &BrokerConfig) -> Result<(), BrokerError> {
        let mut inner = self.inner.lock();
        inner.connected = true;
        inner.active_broker_id = Some(config.id.clone());
        Ok(())
    }

    async fn switch_broker(
        &mut self,
        _wall_id: &str,
        config: &BrokerConfig,
    ) -> Result<(), BrokerError> {
        let mut inner = self.inner.lock();
        let from = inner.active_broker_id.clone();
        inner.switch_log.push((from, config.id.clone()));
        inner.active_broker_id = Some(config.id.clone());
        inner.connected = true;
        Ok(())
    }

    async fn publish(
        &self,
        topic: &str,
        payload: Vec<u8>,
        qos: Qos,
        retain: bool,
    ) -> Result<(), BrokerError> {
        let mut inner = self.inner.lock();
        if !inner.connected {
            return Ok(());
        }
        inner.published.push(PublishedMessage { topic: topic.to_string(), payload, qos, retain });
        Ok(())
    }

    fn try_recv(&mut self) -> Option<BrokerMessage> {
        self.inner.lock().inbound.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_while_disconnected_is_a_silent_no_op() {
        let broker = FakeBroker::new();
        broker.publish("t", b"x".to_vec(), Qos::AtMostOnce, false).await.unwrap();
        assert!(broker.published().is_empty());
    }

    #[tokio::test]
    async fn connect_then_publish_is_recorded() {
        let mut broker = FakeBroker::new();
        broker.connect("wall-1", &BrokerConfig::new("b1", "host:1883")).await.unwrap();
        broker.publish("t", b"x".to_vec(), Qos::AtLeastOnce, true).await.unwrap();
        let published = broker.published();
        assert_eq!(published.len(), 1);
        assert!(published[0].retain);
    }

    #[tokio::test]
    async fn switch_broker_records_from_to() {
        let mut broker = FakeBroker::new();
        broker.connect("wall-1", &BrokerConfig::new("b1", "host:1883")).await.unwrap();
        broker.switch_broker("wall-1", &BrokerConfig::new("b2", "host2:1883")).await.unwrap();
        assert_eq!(broker.switch_log(), vec![(Some("b1".to_string()), "b2".to_string())]);
        assert_eq!(broker.active_broker_id(), Some("b2".to_string()));
    }

    #[tokio::test]
    async fn push_inbound_then_try_recv_drains_fifo() {
        let mut broker = FakeBroker::new();
        broker.push_inbound("a", b"1".to_vec());
        broker.push_inbound("b", b"2".to_vec());
        assert_eq!(broker.try_recv().unwrap().topic, "a");
        assert_eq!(broker.try_recv().unwrap().topic, "b");
        assert!(broker.try_recv().is_none());
    }
}
