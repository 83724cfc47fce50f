// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP client for the external media engine's control API (spec §4.7, §6).
//!
//! The media engine is a prebuilt WebRTC capture/encode/serve process the
//! bridge supervises as a subprocess (see `vu_watchdog_bridge::supervisor`);
//! this module only calls its already-listening HTTP surface. Every request
//! carries an explicit deadline (spec §5) so a wedged media engine can never
//! hang the bridge's per-viewer signaling loop.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-request deadline for every media-engine HTTP call (spec §5).
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, thiserror::Error)]
pub enum MediaEngineError {
    #[error("media engine request failed: {0}")]
    Request(String),
    #[error("media engine returned status {0}")]
    Status(u16),
    #[error("media engine response was not valid JSON: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for MediaEngineError {
    fn from(e: reqwest::Error) -> Self {
        MediaEngineError::Request(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SdpDescription {
    #[serde(rename = "type")]
    pub sdp_type: String,
    pub sdp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IceCandidate {
    pub candidate: String,
    #[serde(rename = "sdpMid", default, skip_serializing_if = "Option::is_none")]
    pub sdp_mid: Option<String>,
    #[serde(rename = "sdpMLineIndex", default, skip_serializing_if = "Option::is_none")]
    pub sdp_m_line_index: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OfferResponse {
    #[serde(rename = "type")]
    sdp_type: String,
    sdp: String,
}

#[derive(Debug, Deserialize)]
struct IceListResponse {
    #[serde(default)]
    candidates: Vec<IceCandidate>,
}

/// Thin wrapper around a shared `reqwest::Client` scoped to one media-engine
/// base URL. Cheap to clone (the inner client is reference-counted).
#[derive(Clone)]
pub struct MediaEngineClient {
    http: reqwest::Client,
    base_url: String,
}

impl MediaEngineClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            base_url: base_url.into(),
        }
    }

    /// `GET /api/getMediaList` — used by the readiness poll during subprocess
    /// startup to confirm the HTTP surface is serving.
    pub async fn get_media_list(&self) -> Result<serde_json::Value, MediaEngineError> {
        let resp = self.http.get(format!("{}/api/getMediaList", self.base_url)).send().await?;
        Self::check_status(&resp)?;
        Ok(resp.json().await?)
    }

    /// `GET /api/createOffer?peerid=...&url=...`
    pub async fn create_offer(
        &self,
        peer_id: &str,
        capture_url: &str,
    ) -> Result<SdpDescription, MediaEngineError> {
        let resp = self
            .http
            .get(format!("{}/api/createOffer", self.base_url))
            .query(&[("peerid", peer_id), ("url", capture_url)])
            .send()
            .await?;
        Self::check_status(&resp)?;
        let body: OfferResponse =
            resp.json().await.map_err(|e| MediaEngineError::Decode(e.to_string()))?;
        Ok(SdpDescription { sdp_type: body.sdp_type, sdp: body.sdp })
    }

    /// `POST /api/setAnswer?peerid=...` with the viewer's SDP answer as the
    /// JSON body.
    pub async fn set_answer(
        &self,
        peer_id: &str,
        answer: &SdpDescription,
    ) -> Result<(), MediaEngineError> {
        let resp = self
            .http
            .post(format!("{}/api/setAnswer", self.base_url))
            .query(&[("peerid", peer_id)])
            .json(answer)
            .send()
            .await?;
        Self::check_status(&resp)
    }

    /// `GET /api/getIceCandidate?peerid=...` — polled at the bridge's ICE
    /// cadence (100-200ms, spec §4.7).
    pub async fn get_ice_candidates(
        &self,
        peer_id: &str,
    ) -> Result<Vec<IceCandidate>, MediaEngineError> {
        let resp = self
            .http
            .get(format!("{}/api/getIceCandidate", self.base_url))
            .query(&[("peerid", peer_id)])
            .send()
            .await?;
        Self::check_status(&resp)?;
        let body: IceListResponse =
            resp.json().await.map_err(|e| MediaEngineError::Decode(e.to_string()))?;
        Ok(body.candidates)
    }

    /// `POST /api/addIceCandidate?peerid=...` — forwards a remote (viewer)
    /// candidate to the media engine.
    pub async fn add_ice_candidate(
        &self,
        peer_id: &str,
        candidate: &IceCandidate,
    ) -> Result<(), MediaEngineError> {
        let resp = self
            .http
            .post(format!("{}/api/addIceCandidate", self.base_url))
            .query(&[("peerid", peer_id)])
            .json(candidate)
            .send()
            .await?;
        Self::check_status(&resp)
    }

    /// `POST /api/hangup?peerid=...` — tears down one viewer's media session.
    pub async fn hangup(&self, peer_id: &str) -> Result<(), MediaEngineError> {
        let resp = self
            .http
            .post(format!("{}/api/hangup", self.base_url))
            .query(&[("peerid", peer_id)])
            .send()
            .await?;
        Self::check_status(&resp)
    }

    fn check_status(resp: &reqwest::Response) -> Result<(), MediaEngineError> {
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(MediaEngineError::Status(resp.status().as_u16()))
        }
    }
}
