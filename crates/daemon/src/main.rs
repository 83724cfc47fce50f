// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Watchdog Daemon (watchdogd)
//!
//! Per-host operations agent for a display-wall endpoint: publishes
//! telemetry/health over MQTT, processes inbound commands under lease
//! arbitration, and bridges WebRTC signaling for the live preview stream.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use tokio::sync::Mutex as AsyncMutex;
use tokio::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vu_watchdog_adapters::{BrokerClient, RumqttcBrokerClient};
use vu_watchdog_core::SystemClock;
use vu_watchdog_daemon::{env, single_instance, DaemonContext, Orchestrator, StreamingManager};

/// Time the daemon waits after startup before publishing its first
/// telemetry snapshot, letting the collectors' first probe land.
const STARTUP_WARMUP: Duration = Duration::from_secs(3);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_logging();

    let wall_id = env::wall_id()?;
    let dashboard_port = env::dashboard_port();

    if let Err(e) = single_instance::check(dashboard_port).await {
        error!(error = %e, "single-instance guard failed");
        std::process::exit(1);
    }

    let brokers = env::brokers()?;
    let media_engine_bin = env::media_engine_bin()?;
    let available = Path::new(&media_engine_bin).exists();

    let mut broker_client = RumqttcBrokerClient::new();
    broker_client.connect(&wall_id, &brokers[0]).await?;
    let broker: Arc<AsyncMutex<Box<dyn BrokerClient>>> = Arc::new(AsyncMutex::new(Box::new(broker_client)));

    let streaming = Arc::new(AsyncMutex::new(StreamingManager::new(
        wall_id.clone(),
        media_engine_bin,
        env::stun_server(),
        env::turn_primary_url(),
        env::turn_fallback_url(),
        available,
    )));

    let shutdown = Arc::new(AtomicBool::new(false));
    let ctx = DaemonContext::new(
        wall_id.clone(),
        brokers.to_vec(),
        brokers[0].id.clone(),
        Arc::clone(&broker),
        Arc::clone(&streaming),
        env::app_start_cmd(),
        env::app_stop_cmd(),
        env::app_restart_cmd(),
        Arc::clone(&shutdown),
    );

    let collectors = vu_watchdog_collectors::CollectorRegistry::spawn(env::collector_config());

    info!(wall_id = %wall_id, "warming up collectors before first publish");
    tokio::time::sleep(STARTUP_WARMUP).await;

    let orchestrator =
        Orchestrator::new(wall_id.clone(), SystemClock, Arc::clone(&broker), collectors, streaming, ctx, brokers[0].id.clone());

    install_signal_handlers(Arc::clone(&shutdown));

    info!(wall_id = %wall_id, "watchdog daemon ready");
    orchestrator.run().await;

    info!("watchdog daemon stopped");
    Ok(())
}

/// SIGTERM/SIGINT both request the same graceful shutdown `QUIT_WATCHDOG`
/// drives: the orchestrator notices the flag at the top of its next tick
/// and exits its loop after finishing that tick's publishes.
fn install_signal_handlers(shutdown: Arc<AtomicBool>) {
    tokio::spawn(async move {
        let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(signal) => signal,
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                return;
            }
        };
        tokio::select! {
            _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
            _ = tokio::signal::ctrl_c() => info!("received SIGINT, shutting down"),
        }
        shutdown.store(true, std::sync::atomic::Ordering::SeqCst);
    });
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry().with(filter).with(fmt::layer()).init();
}
