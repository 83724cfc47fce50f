// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn stopped_is_the_initial_state() {
    let state = StreamingState::stopped(true);
    assert_eq!(state.status, StreamStatus::Stopped);
    assert!(state.pid.is_none());
    assert!(state.available);
}

#[test]
fn mark_running_populates_connection_fields() {
    let mut state = StreamingState::stopped(true);
    state.mark_starting(1, StreamQuality::default_for_monitor());
    state.mark_running(4242, 8443, "https://wall/stream", 1_000);
    assert_eq!(state.status, StreamStatus::Running);
    assert_eq!(state.pid, Some(4242));
    assert_eq!(state.port, Some(8443));
    assert_eq!(state.started_at, Some(1_000));
}

#[test]
fn mark_error_clears_on_next_start() {
    let mut state = StreamingState::stopped(true);
    state.mark_error("engine crashed");
    assert_eq!(state.status, StreamStatus::Error);

    state.mark_starting(1, StreamQuality::default_for_monitor());
    assert!(state.error.is_none());
}

#[test]
fn mark_stopped_clears_connection_fields() {
    let mut state = StreamingState::stopped(true);
    state.mark_running(1, 1, "url", 0);
    state.mark_stopped();
    assert_eq!(state.status, StreamStatus::Stopped);
    assert!(state.pid.is_none());
    assert!(state.viewer_url.is_none());
}

#[test]
fn unavailable_engine_is_serialized() {
    let state = StreamingState::stopped(false);
    let json = serde_json::to_value(&state).unwrap();
    assert_eq!(json["available"], false);
}
