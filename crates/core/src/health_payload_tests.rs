// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::health::HealthEngine;

#[test]
fn build_carries_schema_and_timestamp() {
    let record = TelemetryRecord::builder().timestamp(42).wall_id("wall-7").build();
    let mut engine = HealthEngine::new();
    let evals = engine.evaluate(&record, 100_000);
    let payload = HealthPayload::build(&record, &evals, 100_000, false);
    assert_eq!(payload.schema, HEALTH_SCHEMA);
    assert_eq!(payload.timestamp, 42);
    assert_eq!(payload.wall_id, "wall-7");
    assert_eq!(payload.mode, OperationalMode::Ready);
    assert!(payload.conditions.is_empty());
}

#[test]
fn build_reflects_active_conditions_and_mode() {
    let mut record = TelemetryRecord::builder().build();
    record.system.disk_percent = 99.0;
    let mut engine = HealthEngine::new();
    let evals = engine.evaluate(&record, 100_000);
    let payload = HealthPayload::build(&record, &evals, 100_000, false);
    assert_eq!(payload.mode, OperationalMode::Critical);
    assert_eq!(payload.conditions, vec!["DISK_FULL".to_string()]);
}

#[test]
fn roundtrips_through_json() {
    let record = TelemetryRecord::builder().build();
    let mut engine = HealthEngine::new();
    let evals = engine.evaluate(&record, 100_000);
    let payload = HealthPayload::build(&record, &evals, 100_000, false);
    let json = serde_json::to_string(&payload).unwrap();
    let back: HealthPayload = serde_json::from_str(&json).unwrap();
    assert_eq!(payload, back);
}
