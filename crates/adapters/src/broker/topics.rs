// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Topic-string builders for the `watchdog/{wallId}/…` tree (spec §4.1, §6).

pub fn telemetry(wall_id: &str) -> String {
    format!("watchdog/{wall_id}/telemetry")
}

pub fn health(wall_id: &str) -> String {
    format!("watchdog/{wall_id}/health")
}

pub fn status(wall_id: &str) -> String {
    format!("watchdog/{wall_id}/status")
}

pub fn config(wall_id: &str) -> String {
    format!("watchdog/{wall_id}/config")
}

pub fn event(wall_id: &str) -> String {
    format!("watchdog/{wall_id}/event")
}

pub fn commands(wall_id: &str) -> String {
    format!("watchdog/{wall_id}/commands")
}

pub fn control(wall_id: &str) -> String {
    format!("watchdog/{wall_id}/control")
}

pub fn command_in(wall_id: &str, client_id: &str) -> String {
    format!("watchdog/{wall_id}/command/{client_id}")
}

pub fn command_filter(wall_id: &str) -> String {
    format!("watchdog/{wall_id}/command/+")
}

pub fn ack(wall_id: &str, client_id: &str) -> String {
    format!("watchdog/{wall_id}/ack/{client_id}")
}

pub fn lease(wall_id: &str) -> String {
    format!("watchdog/{wall_id}/lease")
}

pub fn stream_status(wall_id: &str) -> String {
    format!("watchdog/{wall_id}/stream/status")
}

pub fn webrtc_offer(wall_id: &str) -> String {
    format!("watchdog/{wall_id}/webrtc/offer")
}

pub fn webrtc_answer(wall_id: &str) -> String {
    format!("watchdog/{wall_id}/webrtc/answer")
}

pub fn webrtc_ice(wall_id: &str) -> String {
    format!("watchdog/{wall_id}/webrtc/ice")
}

pub fn webrtc_join(wall_id: &str) -> String {
    format!("watchdog/{wall_id}/webrtc/join")
}

pub fn webrtc_leave(wall_id: &str) -> String {
    format!("watchdog/{wall_id}/webrtc/leave")
}

/// Extract `clientId` from an inbound `watchdog/{wallId}/command/{clientId}`
/// topic, if it matches.
pub fn parse_command_client_id<'a>(wall_id: &str, topic: &'a str) -> Option<&'a str> {
    topic.strip_prefix(&format!("watchdog/{wall_id}/command/"))
}
