// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Network reachability probes (spec §4.2): internet reachability + latency,
//! and local-server reachability + peer count. Every probe carries an
//! explicit timeout and never panics — a failed probe is a `ProbeError`
//! the caller swallows into "leave cached value intact" (spec §7).

use std::time::{Duration, Instant};

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("probe request failed: {0}")]
    Request(String),
    #[error("probe response was not valid JSON: {0}")]
    Decode(String),
}

/// Timed HEAD to a well-known endpoint (spec §4.2 "Internet reachability").
/// Returns the observed round-trip latency in milliseconds on success.
pub async fn probe_internet(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> Result<u64, ProbeError> {
    let start = Instant::now();
    let resp = client
        .head(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| ProbeError::Request(e.to_string()))?;
    if !resp.status().is_success() && !resp.status().is_redirection() {
        return Err(ProbeError::Request(format!("status {}", resp.status())));
    }
    Ok(start.elapsed().as_millis() as u64)
}

/// HTTP probe against a known local endpoint (spec §4.2 "Local-server
/// reachability + peer count"). The endpoint is expected to return a JSON
/// array whose length is the connected-peer count.
pub async fn probe_local_server(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> Result<u32, ProbeError> {
    let resp = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| ProbeError::Request(e.to_string()))?;
    if !resp.status().is_success() {
        return Err(ProbeError::Request(format!("status {}", resp.status())));
    }
    let peers: serde_json::Value =
        resp.json().await.map_err(|e| ProbeError::Decode(e.to_string()))?;
    Ok(peers.as_array().map(|a| a.len() as u32).unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn probe_internet_rejects_unreachable_host() {
        let client = reqwest::Client::new();
        let result =
            probe_internet(&client, "http://127.0.0.1:1", Duration::from_millis(200)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn probe_local_server_rejects_unreachable_host() {
        let client = reqwest::Client::new();
        let result =
            probe_local_server(&client, "http://127.0.0.1:1", Duration::from_millis(200)).await;
        assert!(result.is_err());
    }
}
