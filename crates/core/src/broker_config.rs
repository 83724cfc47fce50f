// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Broker endpoint configuration, including the set of brokers a wall may
//! be switched between at runtime (spec §4.1, §4.6 `SWITCH_BROKER`).

use serde::{Deserialize, Serialize};

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerConfig {
    pub id: String,
    pub label: String,
    pub server_url: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
}

impl std::fmt::Debug for BrokerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrokerConfig")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("server_url", &self.server_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl BrokerConfig {
    pub fn new(id: impl Into<String>, server_url: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            server_url: server_url.into(),
            username: String::new(),
            password: String::new(),
        }
    }

    crate::setters! {
        into { label: String, username: String, password: String }
    }
}

#[cfg(test)]
#[path = "broker_config_tests.rs"]
mod tests;
