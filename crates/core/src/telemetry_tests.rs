// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn builder_produces_nominal_record() {
    let record = TelemetryRecord::builder().wall_id("wall-9").timestamp(1_000).build();
    assert_eq!(record.wall_id, "wall-9");
    assert_eq!(record.timestamp, 1_000);
    assert!(record.app.app_running);
    assert!(record.network.internet_reachable);
}

#[test]
fn roundtrips_through_json() {
    let record = TelemetryRecord::builder().build();
    let json = serde_json::to_string(&record).unwrap();
    let back: TelemetryRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(record, back);
}

#[test]
fn absent_lock_file_defaults_healthy() {
    let lock = LockFileRecord::absent();
    assert!(lock.healthy);
    assert!(lock.pid.is_none());
}

#[test]
fn gpu_omitted_when_none() {
    let mut record = TelemetryRecord::builder().build();
    record.system.gpu = None;
    let json = serde_json::to_value(&record).unwrap();
    assert!(json["system"].get("gpu").is_none());
}
