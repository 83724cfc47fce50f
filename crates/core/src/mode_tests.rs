// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::health::{ConditionId, ConditionState};

fn eval(id: ConditionId, level: ConditionLevel, active: bool) -> ConditionEval {
    ConditionEval { id, level, state: ConditionState { raw_active: active, active, active_since: None } }
}

#[test]
fn shutdown_wins_over_everything() {
    let evals = vec![eval(ConditionId::VuosDown, ConditionLevel::Critical, true)];
    assert_eq!(derive_mode(&evals, 100_000, true), OperationalMode::ShuttingDown);
}

#[test]
fn startup_grace_wins_over_critical() {
    let evals = vec![eval(ConditionId::VuosDown, ConditionLevel::Critical, true)];
    assert_eq!(derive_mode(&evals, 4_999, false), OperationalMode::Starting);
}

#[test]
fn startup_grace_boundary_is_exclusive() {
    let evals: Vec<ConditionEval> = vec![];
    assert_eq!(derive_mode(&evals, STARTUP_GRACE_MS, false), OperationalMode::Ready);
    assert_eq!(derive_mode(&evals, STARTUP_GRACE_MS - 1, false), OperationalMode::Starting);
}

#[test]
fn critical_wins_over_degraded() {
    let evals = vec![
        eval(ConditionId::InternetOffline, ConditionLevel::Degraded, true),
        eval(ConditionId::DiskFull, ConditionLevel::Critical, true),
    ];
    assert_eq!(derive_mode(&evals, 100_000, false), OperationalMode::Critical);
}

#[test]
fn degraded_without_critical() {
    let evals = vec![eval(ConditionId::InternetOffline, ConditionLevel::Degraded, true)];
    assert_eq!(derive_mode(&evals, 100_000, false), OperationalMode::Degraded);
}

#[test]
fn inactive_conditions_are_ignored() {
    let evals = vec![
        eval(ConditionId::DiskFull, ConditionLevel::Critical, false),
        eval(ConditionId::InternetOffline, ConditionLevel::Degraded, false),
    ];
    assert_eq!(derive_mode(&evals, 100_000, false), OperationalMode::Ready);
}

#[test]
fn no_conditions_is_ready() {
    let evals: Vec<ConditionEval> = vec![];
    assert_eq!(derive_mode(&evals, 100_000, false), OperationalMode::Ready);
}

#[test]
fn display_matches_serde_rename() {
    assert_eq!(OperationalMode::Degraded.to_string(), "DEGRADED");
    assert_eq!(
        serde_json::to_string(&OperationalMode::Degraded).unwrap(),
        "\"DEGRADED\""
    );
}
