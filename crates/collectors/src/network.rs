// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Internet reachability + local-server reachability collector (spec
//! §4.2). Two independent cadences sharing one `reqwest::Client` and one
//! cache cell.

use crate::config::CollectorConfig;
use crate::registry::{cadence, CollectorHandle};
use std::time::Duration;
use vu_watchdog_adapters::{probe_internet, probe_local_server};
use vu_watchdog_core::NetworkMetrics;

const INTERNET_INTERVAL: Duration = Duration::from_secs(10);
const LOCAL_SERVER_INTERVAL: Duration = Duration::from_secs(3);
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

pub async fn run_network_loop(handle: CollectorHandle<NetworkMetrics>, config: CollectorConfig) {
    let http = reqwest::Client::new();
    let mut internet_tick = cadence(INTERNET_INTERVAL);
    let mut local_server_tick = cadence(LOCAL_SERVER_INTERVAL);

    loop {
        tokio::select! {
            _ = internet_tick.tick() => {
                match probe_internet(&http, &config.internet_probe_url, PROBE_TIMEOUT).await {
                    Ok(latency_ms) => handle.update(|m| {
                        m.internet_reachable = true;
                        m.latency_ms = Some(latency_ms);
                    }),
                    Err(err) => {
                        tracing::debug!(error = %err, "internet reachability probe failed");
                        handle.update(|m| {
                            m.internet_reachable = false;
                            m.latency_ms = None;
                        });
                    }
                }
            }
            _ = local_server_tick.tick() => {
                match probe_local_server(&http, &config.local_server_url, PROBE_TIMEOUT).await {
                    Ok(peer_count) => handle.update(|m| {
                        m.local_server_reachable = true;
                        m.connected_peer_count = peer_count;
                    }),
                    Err(err) => {
                        tracing::debug!(error = %err, "local-server reachability probe failed");
                        handle.update(|m| {
                            m.local_server_reachable = false;
                            m.connected_peer_count = 0;
                        });
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "network_tests.rs"]
mod tests;
