// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory [`MediaEngine`] for tests — records every call and lets the
//! test script canned offers/candidates/failures, mirroring the adapters
//! crate's `FakeBroker`.

use crate::media_engine::MediaEngine;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use vu_watchdog_adapters::{IceCandidate, MediaEngineError, SdpDescription};

#[derive(Default)]
struct Inner {
    offers: HashMap<String, SdpDescription>,
    answers_received: Vec<(String, SdpDescription)>,
    candidates_to_return: HashMap<String, Vec<IceCandidate>>,
    candidates_added: Vec<(String, IceCandidate)>,
    hangups: Vec<String>,
    fail_create_offer: bool,
}

#[derive(Clone, Default)]
pub struct FakeMediaEngine {
    inner: Arc<Mutex<Inner>>,
}

impl FakeMediaEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canned offer returned for `peer_id` by the next `create_offer` call.
    pub fn set_offer(&self, peer_id: impl Into<String>, offer: SdpDescription) {
        self.inner.lock().offers.insert(peer_id.into(), offer);
    }

    /// Canned candidates returned on the next `get_ice_candidates` poll for
    /// `peer_id`. Replaces whatever was queued before.
    pub fn set_candidates(&self, peer_id: impl Into<String>, candidates: Vec<IceCandidate>) {
        self.inner.lock().candidates_to_return.insert(peer_id.into(), candidates);
    }

    pub fn fail_next_create_offer(&self) {
        self.inner.lock().fail_create_offer = true;
    }

    pub fn answers_received(&self) -> Vec<(String, SdpDescription)> {
        self.inner.lock().answers_received.clone()
    }

    pub fn candidates_added(&self) -> Vec<(String, IceCandidate)> {
        self.inner.lock().candidates_added.clone()
    }

    pub fn hangups(&self) -> Vec<String> {
        self.inner.lock().hangups.clone()
    }
}

#[async_trait]
impl MediaEngine for FakeMediaEngine {
    async fn create_offer(
        &self,
        peer_id: &str,
        _capture_url: &str,
    ) -> Result<SdpDescription, MediaEngineError> {
        let mut inner = self.inner.lock();
        if inner.fail_create_offer {
            inner.fail_create_offer = false;
            return Err(MediaEngineError::Status(500));
        }
        inner
            .offers
            .get(peer_id)
            .cloned()
            .ok_or_else(|| MediaEngineError::Status(404))
    }

    async fn set_answer(&self, peer_id: &str, answer: &SdpDescription) -> Result<(), MediaEngineError> {
        self.inner.lock().answers_received.push((peer_id.to_string(), answer.clone()));
        Ok(())
    }

    async fn get_ice_candidates(&self, peer_id: &str) -> Result<Vec<IceCandidate>, MediaEngineError> {
        Ok(self.inner.lock().candidates_to_return.get(peer_id).cloned().unwrap_or_default())
    }

    async fn add_ice_candidate(
        &self,
        peer_id: &str,
        candidate: &IceCandidate,
    ) -> Result<(), MediaEngineError> {
        self.inner.lock().candidates_added.push((peer_id.to_string(), candidate.clone()));
        Ok(())
    }

    async fn hangup(&self, peer_id: &str) -> Result<(), MediaEngineError> {
        self.inner.lock().hangups.push(peer_id.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_offer_returns_canned_offer() {
        let engine = FakeMediaEngine::new();
        engine.set_offer("peer-1", SdpDescription { sdp_type: "offer".to_string(), sdp: "v=0".to_string() });
        let offer = engine.create_offer("peer-1", "screen://0").await.unwrap();
        assert_eq!(offer.sdp, "v=0");
    }

    #[tokio::test]
    async fn create_offer_without_canned_response_fails() {
        let engine = FakeMediaEngine::new();
        assert!(engine.create_offer("peer-1", "screen://0").await.is_err());
    }

    #[tokio::test]
    async fn fail_next_create_offer_fails_exactly_once() {
        let engine = FakeMediaEngine::new();
        engine.set_offer("peer-1", SdpDescription { sdp_type: "offer".to_string(), sdp: "v=0".to_string() });
        engine.fail_next_create_offer();
        assert!(engine.create_offer("peer-1", "screen://0").await.is_err());
        assert!(engine.create_offer("peer-1", "screen://0").await.is_ok());
    }

    #[tokio::test]
    async fn hangup_is_recorded() {
        let engine = FakeMediaEngine::new();
        engine.hangup("peer-1").await.unwrap();
        assert_eq!(engine.hangups(), vec!["peer-1".to_string()]);
    }
}
