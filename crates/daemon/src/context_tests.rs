use super::*;
use std::sync::atomic::AtomicBool;
use vu_watchdog_adapters::FakeBroker;

fn context(brokers: Vec<BrokerConfig>) -> (DaemonContext, Arc<AtomicBool>) {
    let broker = FakeBroker::new();
    let broker: Arc<AsyncMutex<Box<dyn BrokerClient>>> = Arc::new(AsyncMutex::new(Box::new(broker)));
    let streaming = Arc::new(AsyncMutex::new(StreamingManager::new(
        "wall-1",
        "/nonexistent/media-engine",
        "stun:stun.example.com:19302",
        None,
        None,
        false,
    )));
    let shutdown = Arc::new(AtomicBool::new(false));
    let ctx = DaemonContext::new(
        "wall-1",
        brokers,
        "A",
        broker,
        streaming,
        Some("true".to_string()),
        Some("true".to_string()),
        Some("false".to_string()),
        Arc::clone(&shutdown),
    );
    (ctx, shutdown)
}

#[tokio::test]
async fn switch_broker_updates_active_id_and_queues_event() {
    let (mut ctx, _shutdown) = context(vec![BrokerConfig::new("A", "mqtt://a"), BrokerConfig::new("B", "mqtt://b")]);

    let outcome = ctx.switch_broker("B", 1_000).await.unwrap();
    assert!(outcome.message.contains('B'));

    let event = ctx.try_recv_event().await.expect("broker switched event queued");
    assert_eq!(event.event_type, "BROKER_SWITCHED");
}

#[tokio::test]
async fn switch_broker_rejects_unknown_id() {
    let (mut ctx, _shutdown) = context(vec![BrokerConfig::new("A", "mqtt://a")]);
    assert!(ctx.switch_broker("Z", 1_000).await.is_err());
}

#[tokio::test]
async fn quit_watchdog_sets_shutdown_flag() {
    let (mut ctx, shutdown) = context(vec![BrokerConfig::new("A", "mqtt://a")]);
    ctx.quit_watchdog(1_000).await.unwrap();
    assert!(shutdown.load(std::sync::atomic::Ordering::SeqCst));
}

#[tokio::test]
async fn request_telemetry_and_config_queue_force_flags() {
    let (mut ctx, _shutdown) = context(vec![BrokerConfig::new("A", "mqtt://a")]);
    assert!(!ctx.take_forced_telemetry());
    ctx.request_telemetry(1_000).await.unwrap();
    assert!(ctx.take_forced_telemetry());
    assert!(!ctx.take_forced_telemetry());

    ctx.request_config(1_000).await.unwrap();
    assert!(ctx.take_forced_config());
}

#[tokio::test]
async fn app_lifecycle_commands_run_configured_shell_commands() {
    let (mut ctx, _shutdown) = context(vec![BrokerConfig::new("A", "mqtt://a")]);
    assert!(ctx.start_vuos(1_000).await.is_ok());
    assert!(ctx.restart_vuos(1_000).await.is_ok());
    assert!(ctx.stop_vuos(1_000).await.is_err(), "stop command configured to exit nonzero");
}

#[tokio::test]
async fn start_vuos_without_configured_command_fails() {
    let broker = FakeBroker::new();
    let broker: Arc<AsyncMutex<Box<dyn BrokerClient>>> = Arc::new(AsyncMutex::new(Box::new(broker)));
    let streaming = Arc::new(AsyncMutex::new(StreamingManager::new(
        "wall-1",
        "/nonexistent/media-engine",
        "stun:stun.example.com:19302",
        None,
        None,
        false,
    )));
    let mut ctx = DaemonContext::new(
        "wall-1",
        vec![BrokerConfig::new("A", "mqtt://a")],
        "A",
        broker,
        streaming,
        None,
        None,
        None,
        Arc::new(AtomicBool::new(false)),
    );
    assert!(ctx.start_vuos(1_000).await.is_err());
}

#[tokio::test]
async fn start_stream_surfaces_subprocess_spawn_failure() {
    let (mut ctx, _shutdown) = context(vec![BrokerConfig::new("A", "mqtt://a")]);
    let quality = StreamQualityArgs { width: 1920, height: 1080, fps: 30, bitrate_kbps: 4000 };
    assert!(ctx.start_stream(0, quality, 1_000).await.is_err());
}
