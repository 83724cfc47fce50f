// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! GPU collector: first-success-wins strategy (spec §4.2). A native vendor
//! probe is tried first; if it never succeeds, an OS-level fallback is
//! tried instead. Once either strategy succeeds once, the other is never
//! tried again for the lifetime of this task.

use crate::registry::{cadence, CollectorHandle};
use std::time::Duration;
use vu_watchdog_core::GpuMetrics;

const GPU_INTERVAL: Duration = Duration::from_secs(5);

/// Which probe strategy is currently in use. Starts `Undecided` and latches
/// onto whichever strategy first returns a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    Undecided,
    Native,
    OsFallback,
}

/// A GPU probe implementation. Production code has no real vendor-specific
/// probe to ground (spec §1: vendor queries are an external collaborator),
/// so both strategies here always report "no reading" — the latch and
/// cadence behavior is what this module is responsible for, not the actual
/// hardware query.
trait GpuProbe {
    fn probe(&mut self) -> Option<GpuMetrics>;
}

struct NativeVendorProbe;

impl GpuProbe for NativeVendorProbe {
    fn probe(&mut self) -> Option<GpuMetrics> {
        None
    }
}

struct OsFallbackProbe;

impl GpuProbe for OsFallbackProbe {
    fn probe(&mut self) -> Option<GpuMetrics> {
        None
    }
}

pub async fn run_gpu_loop(handle: CollectorHandle<Option<GpuMetrics>>) {
    let mut native = NativeVendorProbe;
    let mut fallback = OsFallbackProbe;
    let mut strategy = Strategy::Undecided;
    let mut tick = cadence(GPU_INTERVAL);

    loop {
        tick.tick().await;
        let reading = match strategy {
            Strategy::Undecided => match native.probe() {
                Some(reading) => {
                    strategy = Strategy::Native;
                    Some(reading)
                }
                None => match fallback.probe() {
                    Some(reading) => {
                        strategy = Strategy::OsFallback;
                        Some(reading)
                    }
                    None => None,
                },
            },
            Strategy::Native => native.probe(),
            Strategy::OsFallback => fallback.probe(),
        };
        if let Some(reading) = reading {
            handle.set(Some(reading));
        }
        // A failed probe leaves the cached value (including `None`)
        // untouched; `GPU_PROBE_FAILED` covers sustained absence.
    }
}

#[cfg(test)]
#[path = "gpu_tests.rs"]
mod tests;
