use super::*;
use std::sync::atomic::AtomicBool;
use vu_watchdog_adapters::FakeBroker;
use vu_watchdog_collectors::registry::CollectorHandle;
use vu_watchdog_core::{AppMetrics, FakeClock, GpuMetrics, NetworkMetrics, SystemMetrics};

struct Harness {
    orchestrator: Orchestrator<FakeClock>,
    broker: FakeBroker,
    app: CollectorHandle<AppMetrics>,
    clock: FakeClock,
}

async fn harness() -> Harness {
    let mut fake_broker = FakeBroker::new();
    let broker_handle = fake_broker.clone();
    fake_broker.connect("wall-1", &vu_watchdog_core::BrokerConfig::new("A", "mqtt://a")).await.unwrap();
    let broker: Arc<AsyncMutex<Box<dyn BrokerClient>>> = Arc::new(AsyncMutex::new(Box::new(fake_broker)));

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
        vec![vu_watchdog_core::BrokerConfig::new("A", "mqtt://a"), vu_watchdog_core::BrokerConfig::new("B", "mqtt://b")],
        "A",
        Arc::clone(&broker),
        Arc::clone(&streaming),
        None,
        None,
        None,
        shutdown,
    );

    let system = CollectorHandle::new(SystemMetrics::baseline());
    let gpu = CollectorHandle::new(None::<GpuMetrics>);
    let network = CollectorHandle::new(NetworkMetrics::baseline());
    let app = CollectorHandle::new(AppMetrics::baseline());
    let collectors = CollectorRegistry::from_handles(system, gpu, network, app.clone());

    let clock = FakeClock::new();
    clock.set_epoch_ms(10_000);

    let orchestrator = Orchestrator::new("wall-1", clock.clone(), broker, collectors, streaming, ctx, "A");

    Harness { orchestrator, broker: broker_handle, app, clock }
}

#[tokio::test]
async fn tick_publishes_telemetry_and_retained_health() {
    let mut h = harness().await;
    h.orchestrator.tick().await;

    let telemetry = h.broker.published_on(&topics::telemetry("wall-1"));
    assert_eq!(telemetry.len(), 1);
    assert!(!telemetry[0].retain);

    let health = h.broker.published_on(&topics::health("wall-1"));
    assert_eq!(health.len(), 1);
    assert!(health[0].retain);
}

#[tokio::test]
async fn first_tick_publishes_config_snapshot() {
    let mut h = harness().await;
    h.orchestrator.tick().await;
    let config = h.broker.published_on(&topics::config("wall-1"));
    assert_eq!(config.len(), 1);
    assert!(config[0].retain);
}

#[tokio::test]
async fn config_does_not_republish_before_interval_elapses() {
    let mut h = harness().await;
    h.orchestrator.tick().await;
    h.broker.clear_published();
    h.clock.advance(Duration::from_secs(2));
    h.orchestrator.tick().await;
    assert!(h.broker.published_on(&topics::config("wall-1")).is_empty());
}

#[tokio::test]
async fn crash_count_increase_emits_vuos_crashed_event() {
    let mut h = harness().await;
    h.orchestrator.tick().await;
    h.broker.clear_published();

    h.app.update(|app| app.crash_count_today = 1);
    h.orchestrator.tick().await;

    let events = h.broker.published_on(&topics::event("wall-1"));
    assert!(events.iter().any(|m| {
        let record: vu_watchdog_core::EventRecord = serde_json::from_slice(&m.payload).unwrap();
        record.event_type == "VUOS_CRASHED"
    }));
}

#[tokio::test]
async fn crash_count_unchanged_emits_no_crash_event() {
    let mut h = harness().await;
    h.orchestrator.tick().await;
    h.broker.clear_published();
    h.orchestrator.tick().await;

    let events = h.broker.published_on(&topics::event("wall-1"));
    assert!(!events.iter().any(|m| {
        let record: vu_watchdog_core::EventRecord = serde_json::from_slice(&m.payload).unwrap();
        record.event_type == "VUOS_CRASHED"
    }));
}

#[tokio::test]
async fn inbound_command_produces_an_ack() {
    let mut h = harness().await;

    let envelope = local_command(vu_watchdog_core::CommandType::RequestTelemetry, 10_000);
    let topic = topics::command_in("wall-1", "client-9");
    h.broker.push_inbound(topic, serde_json::to_vec(&envelope).unwrap());

    h.orchestrator.tick().await;

    let acks = h.broker.published_on(&topics::ack("wall-1", "client-9"));
    assert_eq!(acks.len(), 2, "expect RECEIVED then APPLIED");
}

#[tokio::test]
async fn legacy_control_message_translates_and_dispatches() {
    let mut h = harness().await;

    let legacy = serde_json::json!({ "action": "requestTelemetry", "args": {} });
    h.broker.push_inbound(topics::control("wall-1"), serde_json::to_vec(&legacy).unwrap());

    h.orchestrator.tick().await;

    let acks = h.broker.published_on(&topics::ack("wall-1", LEGACY_CLIENT_ID));
    assert!(!acks.is_empty());
}

#[tokio::test]
async fn unrecognized_legacy_action_is_silently_dropped() {
    let mut h = harness().await;

    let legacy = serde_json::json!({ "action": "doSomethingUnknown", "args": {} });
    h.broker.push_inbound(topics::control("wall-1"), serde_json::to_vec(&legacy).unwrap());

    h.orchestrator.tick().await;

    assert!(h.broker.published_on(&topics::ack("wall-1", LEGACY_CLIENT_ID)).is_empty());
}

#[tokio::test]
async fn lease_request_republishes_retained_lease_state() {
    let mut h = harness().await;

    let request = serde_json::json!({ "owner": "console-1", "expiresTs": 30_000 });
    h.broker.push_inbound(topics::lease("wall-1"), serde_json::to_vec(&request).unwrap());

    h.orchestrator.tick().await;

    let lease = h.broker.published_on(&topics::lease("wall-1"));
    assert_eq!(lease.len(), 1);
    assert!(lease[0].retain);
    let state: serde_json::Value = serde_json::from_slice(&lease[0].payload).unwrap();
    assert_eq!(state["owner"], "console-1");
    assert_eq!(state["expiresTs"], 30_000);
}

#[tokio::test]
async fn webrtc_join_with_no_stream_running_does_not_panic() {
    let mut h = harness().await;

    let join = serde_json::json!({ "from": "viewer-1" });
    h.broker.push_inbound(topics::webrtc_join("wall-1"), serde_json::to_vec(&join).unwrap());

    h.orchestrator.tick().await;
}

#[tokio::test]
async fn malformed_command_payload_is_dropped_without_panicking() {
    let mut h = harness().await;
    h.broker.push_inbound(topics::command_in("wall-1", "client-1"), b"not json".to_vec());
    h.orchestrator.tick().await;
    assert!(h.broker.published_on(&topics::ack("wall-1", "client-1")).is_empty());
}
