// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! vu-watchdog-adapters: I/O boundaries — the MQTT-like broker connection,
//! HTTP reachability probes, and the external media engine's control API.
//! Everything here is a thin, fallible wrapper with a trait seam so the
//! daemon and bridge crates can be exercised against fakes in tests.

pub mod broker;
pub mod media_engine;
pub mod probe;

pub use broker::{BrokerClient, BrokerError, BrokerMessage, BrokerSubscription, RumqttcBrokerClient};
#[cfg(any(test, feature = "test-support"))]
pub use broker::{FakeBroker, PublishedMessage};
pub use media_engine::{IceCandidate, MediaEngineClient, MediaEngineError, SdpDescription};
pub use probe::{probe_internet, probe_local_server, ProbeError};
