// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! WebRTC signaling wire payloads (spec §6). Published/consumed on the
//! `webrtc/{offer,answer,ice,join,leave}` topics under a wall's topic tree.

use serde::{Deserialize, Serialize};
use vu_watchdog_adapters::{IceCandidate, SdpDescription};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IceServer {
    pub urls: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

/// Retained "ready" announcement published once the bridge connects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadyAnnouncement {
    #[serde(rename = "type")]
    pub message_type: String,
    pub from: String,
    #[serde(rename = "wallId")]
    pub wall_id: String,
    #[serde(rename = "iceServers")]
    pub ice_servers: Vec<IceServer>,
}

impl ReadyAnnouncement {
    pub fn new(from: impl Into<String>, wall_id: impl Into<String>, ice_servers: Vec<IceServer>) -> Self {
        Self { message_type: "ready".to_string(), from: from.into(), wall_id: wall_id.into(), ice_servers }
    }
}

/// Targeted offer published on the offer channel, addressed to one viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferMessage {
    #[serde(rename = "type")]
    pub message_type: String,
    pub description: SdpDescription,
    #[serde(rename = "iceServers")]
    pub ice_servers: Vec<IceServer>,
    pub to: String,
    pub from: String,
}

impl OfferMessage {
    pub fn new(to: impl Into<String>, from: impl Into<String>, description: SdpDescription, ice_servers: Vec<IceServer>) -> Self {
        Self { message_type: "offer".to_string(), description, ice_servers, to: to.into(), from: from.into() }
    }
}

/// Inbound answer from a viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerMessage {
    pub description: SdpDescription,
    pub to: String,
    pub from: String,
}

/// Candidate relayed in either direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateMessage {
    pub candidate: IceCandidate,
    pub to: String,
    pub from: String,
}

/// Viewer join/leave signal — just the viewer's own id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerSignal {
    pub from: String,
}

/// Everything a signaling-bridge operation might need to publish, handed
/// back to the orchestrator so the bridge crate itself never touches a
/// broker client.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundSignal {
    Ready(ReadyAnnouncement),
    Offer(OfferMessage),
    Candidate(CandidateMessage),
    /// `Bridge.stop()`'s retained-clear publish: an empty, retained payload
    /// on the offer channel.
    ClearRetainedOffer,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_announcement_serializes_with_camel_case_fields() {
        let ready = ReadyAnnouncement::new("pub-1", "wall-1", vec![]);
        let json = serde_json::to_value(&ready).unwrap();
        assert_eq!(json["type"], "ready");
        assert_eq!(json["wallId"], "wall-1");
    }

    #[test]
    fn viewer_signal_roundtrips() {
        let signal = ViewerSignal { from: "viewer-1".to_string() };
        let json = serde_json::to_string(&signal).unwrap();
        let back: ViewerSignal = serde_json::from_str(&json).unwrap();
        assert_eq!(signal, back);
    }
}
