// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The signaling bridge's view of the media engine's control API — a trait
//! seam over `vu_watchdog_adapters::MediaEngineClient` so viewer-lifecycle
//! logic can be exercised against [`crate::fake_media_engine::FakeMediaEngine`]
//! without a real subprocess.

use async_trait::async_trait;
use vu_watchdog_adapters::{IceCandidate, MediaEngineClient, MediaEngineError, SdpDescription};

#[async_trait]
pub trait MediaEngine: Send + Sync {
    async fn create_offer(&self, peer_id: &str, capture_url: &str)
        -> Result<SdpDescription, MediaEngineError>;
    async fn set_answer(&self, peer_id: &str, answer: &SdpDescription) -> Result<(), MediaEngineError>;
    async fn get_ice_candidates(&self, peer_id: &str) -> Result<Vec<IceCandidate>, MediaEngineError>;
    async fn add_ice_candidate(
        &self,
        peer_id: &str,
        candidate: &IceCandidate,
    ) -> Result<(), MediaEngineError>;
    async fn hangup(&self, peer_id: &str) -> Result<(), MediaEngineError>;
}

#[async_trait]
impl MediaEngine for MediaEngineClient {
    async fn create_offer(
        &self,
        peer_id: &str,
        capture_url: &str,
    ) -> Result<SdpDescription, MediaEngineError> {
        MediaEngineClient::create_offer(self, peer_id, capture_url).await
    }

    async fn set_answer(&self, peer_id: &str, answer: &SdpDescription) -> Result<(), MediaEngineError> {
        MediaEngineClient::set_answer(self, peer_id, answer).await
    }

    async fn get_ice_candidates(&self, peer_id: &str) -> Result<Vec<IceCandidate>, MediaEngineError> {
        MediaEngineClient::get_ice_candidates(self, peer_id).await
    }

    async fn add_ice_candidate(
        &self,
        peer_id: &str,
        candidate: &IceCandidate,
    ) -> Result<(), MediaEngineError> {
        MediaEngineClient::add_ice_candidate(self, peer_id, candidate).await
    }

    async fn hangup(&self, peer_id: &str) -> Result<(), MediaEngineError> {
        MediaEngineClient::hangup(self, peer_id).await
    }
}
