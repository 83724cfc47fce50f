// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared collector cache cells and the handle that spawns every
//! collector's background loop (spec §4.2 "Concurrency").
//!
//! Each collector owns its own `tokio::time::interval` timer and writes
//! into a `parking_lot::Mutex`-guarded cache cell; the Assembler only ever
//! reads these cells, never blocking on a collector's own I/O.

use crate::config::CollectorConfig;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use vu_watchdog_core::{AppMetrics, GpuMetrics, NetworkMetrics, SystemMetrics};

/// A single-writer, multi-reader cache cell. Cheap to clone (`Arc` inside).
#[derive(Clone)]
pub struct CollectorHandle<T> {
    inner: Arc<Mutex<T>>,
}

impl<T: Clone> CollectorHandle<T> {
    pub fn new(initial: T) -> Self {
        Self { inner: Arc::new(Mutex::new(initial)) }
    }

    pub fn get(&self) -> T {
        self.inner.lock().clone()
    }

    pub fn set(&self, value: T) {
        *self.inner.lock() = value;
    }

    pub fn update(&self, f: impl FnOnce(&mut T)) {
        f(&mut self.inner.lock());
    }
}

/// Owns every collector's cache cell and the background tasks that feed
/// them. Dropping the registry aborts all collector tasks.
pub struct CollectorRegistry {
    pub system: CollectorHandle<SystemMetrics>,
    pub gpu: CollectorHandle<Option<GpuMetrics>>,
    pub network: CollectorHandle<NetworkMetrics>,
    pub app: CollectorHandle<AppMetrics>,
    tasks: Vec<JoinHandle<()>>,
}

impl CollectorRegistry {
    /// Spawn every collector's independent cadence loop (spec §4.2 table).
    /// Each collector never blocks the others; a failed probe just leaves
    /// its cache cell untouched.
    pub fn spawn(config: CollectorConfig) -> Self {
        let system = CollectorHandle::new(SystemMetrics::baseline());
        let gpu = CollectorHandle::new(None);
        let network = CollectorHandle::new(NetworkMetrics::baseline());
        let app = CollectorHandle::new(AppMetrics::baseline());

        let mut tasks = Vec::new();

        tasks.push(tokio::spawn(crate::system::run_system_loop(system.clone())));
        tasks.push(tokio::spawn(crate::gpu::run_gpu_loop(gpu.clone())));
        tasks.push(tokio::spawn(crate::network::run_network_loop(network.clone(), config.clone())));
        tasks.push(tokio::spawn(crate::app::run_app_loop(app.clone(), config)));

        Self { system, gpu, network, app, tasks }
    }

    /// Abort every collector task. Idempotent.
    pub fn shutdown(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }

    /// Build a registry around pre-populated cache cells with no
    /// background tasks, for exercising the Assembler against known
    /// values without going through real collector loops.
    #[cfg(any(test, feature = "test-support"))]
    pub fn from_handles(
        system: CollectorHandle<SystemMetrics>,
        gpu: CollectorHandle<Option<GpuMetrics>>,
        network: CollectorHandle<NetworkMetrics>,
        app: CollectorHandle<AppMetrics>,
    ) -> Self {
        Self { system, gpu, network, app, tasks: Vec::new() }
    }
}

impl Drop for CollectorRegistry {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Build a `tokio::time::interval` that doesn't try to "catch up" missed
/// ticks — a slow probe just delays the next one instead of firing in a
/// burst (default `Burst` would do the latter).
pub fn cadence(period: Duration) -> tokio::time::Interval {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    interval
}
