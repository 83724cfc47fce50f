// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! vu-watchdog-bridge: the WebRTC signaling bridge (spec §4.7) — one local
//! media engine subprocess fanned out to N independent viewer sessions over
//! the message bus. This crate has no broker dependency of its own; the
//! daemon orchestrator drains [`signaling::SignalingBridge::try_recv_outbound`]
//! and publishes the results.

pub mod error;
pub mod ice_servers;
pub mod media_engine;
pub mod payload;
pub mod process;
pub mod signaling;
pub mod viewer_session;

#[cfg(any(test, feature = "test-support"))]
pub mod fake_media_engine;

pub use error::BridgeError;
pub use ice_servers::discover_ice_servers;
pub use media_engine::MediaEngine;
pub use payload::{
    AnswerMessage, CandidateMessage, IceServer, OfferMessage, OutboundSignal, ReadyAnnouncement, ViewerSignal,
};
pub use process::{MediaProcessSupervisor, CANDIDATE_PORTS};
pub use signaling::SignalingBridge;

#[cfg(any(test, feature = "test-support"))]
pub use fake_media_engine::FakeMediaEngine;
