// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TURN credential discovery (spec §4.7). Tries a primary provider, then a
//! fallback, then gives up and returns a public relay so viewers always get
//! *some* ICE server list in the retained ready announcement.

use crate::payload::IceServer;
use std::time::Duration;

const PROVIDER_TIMEOUT: Duration = Duration::from_secs(5);

/// Public STUN-only fallback used when both TURN providers fail. No
/// credentials required; it can't relay, but it keeps same-network peers
/// working.
fn public_relay_fallback(stun_server: &str) -> Vec<IceServer> {
    vec![IceServer { urls: stun_server.to_string(), username: None, credential: None }]
}

#[derive(serde::Deserialize)]
struct TurnCredentialResponse {
    urls: Vec<String>,
    username: String,
    credential: String,
}

async fn fetch_from_provider(http: &reqwest::Client, url: &str) -> Option<Vec<IceServer>> {
    let resp = http.get(url).timeout(PROVIDER_TIMEOUT).send().await.ok()?;
    if !resp.status().is_success() {
        return None;
    }
    let body: TurnCredentialResponse = resp.json().await.ok()?;
    Some(
        body.urls
            .into_iter()
            .map(|urls| IceServer {
                urls,
                username: Some(body.username.clone()),
                credential: Some(body.credential.clone()),
            })
            .collect(),
    )
}

/// Resolve the ICE server list to embed in the ready announcement: primary
/// TURN provider, then fallback provider, then a bare STUN relay.
pub async fn discover_ice_servers(
    http: &reqwest::Client,
    stun_server: &str,
    primary_provider_url: Option<&str>,
    fallback_provider_url: Option<&str>,
) -> Vec<IceServer> {
    if let Some(url) = primary_provider_url {
        if let Some(servers) = fetch_from_provider(http, url).await {
            return servers;
        }
        tracing::warn!(url, "primary TURN credential provider failed, trying fallback");
    }
    if let Some(url) = fallback_provider_url {
        if let Some(servers) = fetch_from_provider(http, url).await {
            return servers;
        }
        tracing::warn!(url, "fallback TURN credential provider failed, using public relay");
    }
    public_relay_fallback(stun_server)
}
