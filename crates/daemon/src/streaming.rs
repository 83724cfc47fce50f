// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wires together the media engine subprocess, the signaling bridge, and
//! the local [`StreamingState`] (spec §4.7). Owns the one capture pipeline a
//! wall may run at a time; `START_STREAM`/`STOP_STREAM`/`SET_STREAM_QUALITY`
//! all go through here.

use std::sync::Arc;

use vu_watchdog_bridge::{discover_ice_servers, BridgeError, MediaProcessSupervisor, SignalingBridge};
use vu_watchdog_core::{StreamQuality, StreamingState};

pub struct StreamingManager {
    supervisor: MediaProcessSupervisor,
    state: StreamingState,
    bridge: Option<SignalingBridge>,
    wall_id: String,
    media_engine_bin: String,
    stun_server: String,
    turn_primary_url: Option<String>,
    turn_fallback_url: Option<String>,
    http: reqwest::Client,
}

impl StreamingManager {
    pub fn new(
        wall_id: impl Into<String>,
        media_engine_bin: impl Into<String>,
        stun_server: impl Into<String>,
        turn_primary_url: Option<String>,
        turn_fallback_url: Option<String>,
        available: bool,
    ) -> Self {
        Self {
            supervisor: MediaProcessSupervisor::new(),
            state: StreamingState::stopped(available),
            bridge: None,
            wall_id: wall_id.into(),
            media_engine_bin: media_engine_bin.into(),
            stun_server: stun_server.into(),
            turn_primary_url,
            turn_fallback_url,
            http: reqwest::Client::new(),
        }
    }

    pub fn state(&self) -> &StreamingState {
        &self.state
    }

    pub fn bridge_mut(&mut self) -> Option<&mut SignalingBridge> {
        self.bridge.as_mut()
    }

    pub fn is_running(&self) -> bool {
        self.bridge.is_some()
    }

    pub async fn start(&mut self, monitor: u32, quality: StreamQuality, now_ms: u64) -> Result<(), BridgeError> {
        let client =
            self.supervisor.start(&mut self.state, &self.media_engine_bin, &self.stun_server, monitor, quality, now_ms).await?;

        let ice_servers = discover_ice_servers(
            &self.http,
            &self.stun_server,
            self.turn_primary_url.as_deref(),
            self.turn_fallback_url.as_deref(),
        )
        .await;

        let mut bridge = SignalingBridge::new(Arc::new(client), self.wall_id.clone(), monitor);
        bridge.start(ice_servers);
        self.bridge = Some(bridge);
        Ok(())
    }

    pub async fn stop(&mut self) {
        if let Some(mut bridge) = self.bridge.take() {
            bridge.stop().await;
        }
        self.supervisor.stop(&mut self.state).await;
    }

    /// Per the stop-then-restart design for in-place quality changes: the
    /// terminal ack is only sent once the restarted process reports ready.
    pub async fn set_quality(&mut self, quality: StreamQuality, now_ms: u64) -> Result<(), BridgeError> {
        let monitor = self.state.monitor;
        self.stop().await;
        self.start(monitor, quality, now_ms).await
    }
}
