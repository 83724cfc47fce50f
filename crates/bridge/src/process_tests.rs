use super::*;
use vu_watchdog_core::StreamStatus;

#[tokio::test]
async fn pick_port_returns_one_of_the_candidate_ports() {
    let port = pick_port().await.expect("a free port");
    assert!(CANDIDATE_PORTS.contains(&port));
}

#[tokio::test]
async fn start_fails_fast_when_binary_does_not_exist() {
    let mut supervisor = MediaProcessSupervisor::new();
    let mut state = StreamingState::stopped(true);
    let result = supervisor
        .start(&mut state, "/nonexistent/media-engine-binary", "stun:stun.example.com:19302", 0, StreamQuality::default_for_monitor(), 0)
        .await;
    assert!(result.is_err());
    assert_eq!(state.status, StreamStatus::Starting, "mark_starting happens before the spawn attempt");
}

#[tokio::test]
async fn stop_without_a_running_process_is_a_no_op() {
    let mut supervisor = MediaProcessSupervisor::new();
    let mut state = StreamingState::stopped(true);
    supervisor.stop(&mut state).await;
    assert_eq!(state.status, StreamStatus::Stopped);
}
