use super::*;
use std::time::Duration;

#[tokio::test]
async fn run_network_loop_marks_unreachable_probes_when_targets_are_unreachable() {
    let handle = CollectorHandle::new(NetworkMetrics::nominal());
    let mut config = CollectorConfig::test_default();
    config.internet_probe_url = "http://127.0.0.1:1".to_string();
    config.local_server_url = "http://127.0.0.1:1".to_string();

    let task = tokio::spawn(run_network_loop(handle.clone(), config));
    tokio::time::sleep(Duration::from_millis(200)).await;
    task.abort();

    let snapshot = handle.get();
    assert!(!snapshot.internet_reachable);
    assert!(!snapshot.local_server_reachable);
}
