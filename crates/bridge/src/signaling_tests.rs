use super::*;
use crate::fake_media_engine::FakeMediaEngine;
use vu_watchdog_adapters::SdpDescription;

fn offer(sdp: &str) -> SdpDescription {
    SdpDescription { sdp_type: "offer".to_string(), sdp: sdp.to_string() }
}

#[tokio::test]
async fn join_publishes_an_offer_and_starts_ice_polling() {
    let engine = FakeMediaEngine::new();
    let mut bridge = SignalingBridge::new(Arc::new(engine.clone()), "wall-1", 0);

    let peer_id = format!("{}-viewer-1", bridge.publisher_id());
    engine.set_offer(peer_id, offer("v=0"));

    bridge.join("viewer-1", 0).await.unwrap();

    let outbound = bridge.try_recv_outbound();
    assert!(matches!(outbound, Some(OutboundSignal::Offer(_))));
    assert_eq!(bridge.viewer_count(), 1);
    assert!(bridge.has_live_ice_polling());
}

#[tokio::test]
async fn rapid_rejoin_within_debounce_window_is_ignored() {
    let engine = FakeMediaEngine::new();
    let mut bridge = SignalingBridge::new(Arc::new(engine.clone()), "wall-1", 0);
    let peer_id = format!("{}-viewer-1", bridge.publisher_id());
    engine.set_offer(peer_id, offer("v=0"));

    bridge.join("viewer-1", 0).await.unwrap();
    bridge.try_recv_outbound();
    bridge.join("viewer-1", 500).await.unwrap();

    assert!(bridge.try_recv_outbound().is_none(), "rejoin inside 2s debounce should be ignored");
}

#[tokio::test]
async fn answer_after_first_is_discarded() {
    let engine = FakeMediaEngine::new();
    let mut bridge = SignalingBridge::new(Arc::new(engine.clone()), "wall-1", 0);
    let peer_id = format!("{}-viewer-1", bridge.publisher_id());
    engine.set_offer(peer_id, offer("v=0"));
    bridge.join("viewer-1", 0).await.unwrap();

    let answer = AnswerMessage {
        description: SdpDescription { sdp_type: "answer".to_string(), sdp: "v=0 answer".to_string() },
        to: "pub".to_string(),
        from: "viewer-1".to_string(),
    };
    bridge.answer(&answer).await.unwrap();
    bridge.answer(&answer).await.unwrap();

    assert_eq!(engine.answers_received().len(), 1);
}

#[tokio::test]
async fn answer_from_unknown_viewer_is_dropped_without_error() {
    let engine = FakeMediaEngine::new();
    let mut bridge = SignalingBridge::new(Arc::new(engine), "wall-1", 0);
    let answer = AnswerMessage {
        description: SdpDescription { sdp_type: "answer".to_string(), sdp: "v=0".to_string() },
        to: "pub".to_string(),
        from: "ghost-viewer".to_string(),
    };
    assert!(bridge.answer(&answer).await.is_ok());
}

#[tokio::test]
async fn leave_stops_ice_polling_and_hangs_up() {
    let engine = FakeMediaEngine::new();
    let mut bridge = SignalingBridge::new(Arc::new(engine.clone()), "wall-1", 0);
    let peer_id = format!("{}-viewer-1", bridge.publisher_id());
    engine.set_offer(peer_id, offer("v=0"));
    bridge.join("viewer-1", 0).await.unwrap();

    bridge.leave("viewer-1").await;

    assert_eq!(bridge.viewer_count(), 0);
    assert_eq!(engine.hangups().len(), 1);
}

#[tokio::test]
async fn stop_cleans_up_every_viewer_and_clears_retained_offer() {
    let engine = FakeMediaEngine::new();
    let mut bridge = SignalingBridge::new(Arc::new(engine.clone()), "wall-1", 0);
    for viewer_id in ["viewer-1", "viewer-2"] {
        let peer_id = format!("{}-{viewer_id}", bridge.publisher_id());
        engine.set_offer(peer_id, offer("v=0"));
        bridge.join(viewer_id, 0).await.unwrap();
        bridge.try_recv_outbound();
    }

    bridge.stop().await;

    assert_eq!(bridge.viewer_count(), 0);
    assert_eq!(engine.hangups().len(), 2);
    assert!(!bridge.has_live_ice_polling(), "invariant I6: no ICE polling timer remains live");
    let mut saw_clear = false;
    while let Some(signal) = bridge.try_recv_outbound() {
        if matches!(signal, OutboundSignal::ClearRetainedOffer) {
            saw_clear = true;
        }
    }
    assert!(saw_clear);
}

#[tokio::test]
async fn join_fails_after_exhausting_retries_when_offer_unavailable() {
    let engine = FakeMediaEngine::new();
    let mut bridge = SignalingBridge::new(Arc::new(engine), "wall-1", 0);
    let result = bridge.join("viewer-1", 0).await;
    assert!(result.is_err());
    assert_eq!(bridge.viewer_count(), 0);
}
