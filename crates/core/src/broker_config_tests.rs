// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn debug_redacts_password() {
    let cfg = BrokerConfig::new("broker-1", "mqtts://a").password("super-secret");
    let rendered = format!("{:?}", cfg);
    assert!(!rendered.contains("super-secret"));
    assert!(rendered.contains("<redacted>"));
}

#[test]
fn password_is_not_serialized() {
    let cfg = BrokerConfig::new("broker-1", "mqtts://a").password("super-secret");
    let json = serde_json::to_value(&cfg).unwrap();
    assert!(json.get("password").is_none());
}

#[test]
fn new_defaults_label_to_id() {
    let cfg = BrokerConfig::new("broker-1", "mqtts://a");
    assert_eq!(cfg.label, "broker-1");
}

#[test]
fn setters_chain() {
    let cfg = BrokerConfig::new("broker-1", "mqtts://a").label("Lobby").username("wd");
    assert_eq!(cfg.label, "Lobby");
    assert_eq!(cfg.username, "wd");
}
