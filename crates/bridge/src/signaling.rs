// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The signaling bridge (spec §4.7): converts one local WebRTC source into
//! N independent viewer sessions over the message bus. This module has no
//! broker dependency of its own — join/answer/ICE/leave handlers perform
//! the media-engine I/O and queue results onto an outbound channel; the
//! orchestrator drains it and publishes to the bus. That keeps the bridge
//! crate testable against [`crate::fake_media_engine::FakeMediaEngine`]
//! without a fake broker too.

use crate::error::BridgeError;
use crate::media_engine::MediaEngine;
use crate::payload::{AnswerMessage, CandidateMessage, IceServer, OfferMessage, OutboundSignal, ReadyAnnouncement};
use crate::viewer_session::ViewerSession;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use vu_watchdog_adapters::IceCandidate;
use vu_watchdog_core::{PublisherId, ViewerPhase, ViewerRecord};

/// Debounce window for rapid rejoins (spec §4.7 "Join").
const REJOIN_DEBOUNCE_MS: u64 = 2_000;
/// Offer-fetch retry policy (spec §4.7 "Join").
const OFFER_FETCH_ATTEMPTS: u32 = 3;
const OFFER_FETCH_BACKOFF: Duration = Duration::from_millis(500);
/// ICE polling cadence and safety cutoff (spec §4.7).
const ICE_POLL_INTERVAL: Duration = Duration::from_millis(150);
const ICE_POLL_MAX_DURATION: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LifecycleState {
    Disconnected,
    Connected,
}

pub struct SignalingBridge {
    media: Arc<dyn MediaEngine>,
    publisher_id: PublisherId,
    wall_id: String,
    capture_monitor: u32,
    viewers: HashMap<String, ViewerSession>,
    last_join_at_ms: HashMap<String, u64>,
    outbound_tx: mpsc::UnboundedSender<OutboundSignal>,
    outbound_rx: mpsc::UnboundedReceiver<OutboundSignal>,
    state: LifecycleState,
}

impl SignalingBridge {
    pub fn new(media: Arc<dyn MediaEngine>, wall_id: impl Into<String>, capture_monitor: u32) -> Self {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        Self {
            media,
            publisher_id: PublisherId::new(),
            wall_id: wall_id.into(),
            capture_monitor,
            viewers: HashMap::new(),
            last_join_at_ms: HashMap::new(),
            outbound_tx,
            outbound_rx,
            state: LifecycleState::Disconnected,
        }
    }

    pub fn publisher_id(&self) -> &PublisherId {
        &self.publisher_id
    }

    pub fn is_connected(&self) -> bool {
        self.state == LifecycleState::Connected
    }

    /// Next queued outbound message, if any. Non-blocking; the orchestrator
    /// calls this every tick alongside the broker's own `try_recv`.
    pub fn try_recv_outbound(&mut self) -> Option<OutboundSignal> {
        self.outbound_rx.try_recv().ok()
    }

    /// `Bridge.start(wallId)` (spec §4.7). Caller is responsible for
    /// checking `StreamingState.status == Running` first (spec:
    /// "requires streaming status = running").
    pub fn start(&mut self, ice_servers: Vec<IceServer>) {
        let ready = ReadyAnnouncement::new(self.publisher_id.to_string(), self.wall_id.clone(), ice_servers);
        self.state = LifecycleState::Connected;
        let _ = self.outbound_tx.send(OutboundSignal::Ready(ready));
    }

    /// `Bridge.stop()`: cleans up every viewer (aborting every ICE-polling
    /// task and calling hangup on each), clears the retained offer, and
    /// transitions to disconnected (spec §4.7, invariant I6).
    pub async fn stop(&mut self) {
        let viewer_ids: Vec<String> = self.viewers.keys().cloned().collect();
        for viewer_id in viewer_ids {
            self.cleanup_viewer(&viewer_id).await;
        }
        self.state = LifecycleState::Disconnected;
        let _ = self.outbound_tx.send(OutboundSignal::ClearRetainedOffer);
    }

    async fn cleanup_viewer(&mut self, viewer_id: &str) {
        if let Some(mut session) = self.viewers.remove(viewer_id) {
            session.stop_ice_polling();
            let peer_id = session.record.lock().peer_id.clone();
            if let Err(err) = self.media.hangup(&peer_id).await {
                tracing::debug!(viewer_id, error = %err, "hangup failed during viewer cleanup");
            }
        }
    }

    /// `join(viewerId)` (spec §4.7 "Join").
    pub async fn join(&mut self, viewer_id: &str, now_ms: u64) -> Result<(), BridgeError> {
        if let Some(&last) = self.last_join_at_ms.get(viewer_id) {
            if now_ms.saturating_sub(last) < REJOIN_DEBOUNCE_MS {
                return Ok(());
            }
        }
        self.last_join_at_ms.insert(viewer_id.to_string(), now_ms);

        if self.viewers.contains_key(viewer_id) {
            self.cleanup_viewer(viewer_id).await;
        }

        let peer_id = format!("{}-{viewer_id}", self.publisher_id);
        let capture_url = format!("screen://{}", self.capture_monitor);
        let offer = fetch_offer_with_retry(self.media.as_ref(), &peer_id, &capture_url).await?;

        let mut record = ViewerRecord::new(viewer_id, peer_id.clone(), now_ms);
        record.phase = ViewerPhase::SentOffer;
        let mut session = ViewerSession::new(record);

        let offer_message =
            OfferMessage::new(viewer_id.to_string(), self.publisher_id.to_string(), offer, Vec::new());
        let _ = self.outbound_tx.send(OutboundSignal::Offer(offer_message));

        let poll_task = spawn_ice_poll_task(
            Arc::clone(&self.media),
            session.record.clone(),
            peer_id,
            viewer_id.to_string(),
            self.publisher_id.to_string(),
            self.outbound_tx.clone(),
        );
        session.set_ice_poll_task(poll_task);

        self.viewers.insert(viewer_id.to_string(), session);
        Ok(())
    }

    /// `Answer` (spec §4.7): first answer per viewer only.
    pub async fn answer(&mut self, answer: &AnswerMessage) -> Result<(), BridgeError> {
        let Some(session) = self.viewers.get(&answer.from) else {
            tracing::debug!(viewer_id = %answer.from, "answer from unknown viewer, dropping");
            return Ok(());
        };
        let (peer_id, already_answered) = {
            let record = session.record.lock();
            (record.peer_id.clone(), record.answer_received)
        };
        if already_answered {
            tracing::debug!(viewer_id = %answer.from, "duplicate answer, discarding");
            return Ok(());
        }
        self.media.set_answer(&peer_id, &answer.description).await?;
        session.record.lock().apply_answer();
        Ok(())
    }

    /// `Remote ICE` (spec §4.7): forward an inbound candidate to the media
    /// engine.
    pub async fn remote_ice(&mut self, candidate: &CandidateMessage) -> Result<(), BridgeError> {
        let Some(session) = self.viewers.get(&candidate.from) else {
            tracing::debug!(viewer_id = %candidate.from, "ice candidate from unknown viewer, dropping");
            return Ok(());
        };
        let peer_id = session.record.lock().peer_id.clone();
        self.media.add_ice_candidate(&peer_id, &candidate.candidate).await?;
        Ok(())
    }

    /// `Leave` (spec §4.7).
    pub async fn leave(&mut self, viewer_id: &str) {
        self.cleanup_viewer(viewer_id).await;
    }

    pub fn viewer_count(&self) -> usize {
        self.viewers.len()
    }

    pub fn has_live_ice_polling(&self) -> bool {
        self.viewers.values().any(|s| s.is_ice_polling_live())
    }
}

async fn fetch_offer_with_retry(
    media: &dyn MediaEngine,
    peer_id: &str,
    capture_url: &str,
) -> Result<vu_watchdog_adapters::SdpDescription, BridgeError> {
    let mut attempt = 0;
    loop {
        if attempt > 0 {
            tokio::time::sleep(OFFER_FETCH_BACKOFF).await;
        }
        match media.create_offer(peer_id, capture_url).await {
            Ok(offer) => return Ok(offer),
            Err(err) if attempt + 1 == OFFER_FETCH_ATTEMPTS => return Err(BridgeError::MediaEngine(err)),
            Err(_) => attempt += 1,
        }
    }
}

fn spawn_ice_poll_task(
    media: Arc<dyn MediaEngine>,
    record: Arc<parking_lot::Mutex<ViewerRecord>>,
    peer_id: String,
    viewer_id: String,
    publisher_id: String,
    outbound_tx: mpsc::UnboundedSender<OutboundSignal>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let deadline = tokio::time::Instant::now() + ICE_POLL_MAX_DURATION;
        let mut interval = tokio::time::interval(ICE_POLL_INTERVAL);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            if tokio::time::Instant::now() >= deadline {
                break;
            }
            let candidates = match media.get_ice_candidates(&peer_id).await {
                Ok(candidates) => candidates,
                Err(err) => {
                    tracing::debug!(viewer_id, error = %err, "ice candidate poll failed");
                    continue;
                }
            };
            for candidate in candidates {
                let is_new = record.lock().record_candidate_sent(candidate.candidate.clone());
                if is_new {
                    let message = CandidateMessage {
                        candidate: IceCandidate {
                            candidate: candidate.candidate,
                            sdp_mid: candidate.sdp_mid,
                            sdp_m_line_index: candidate.sdp_m_line_index,
                        },
                        to: viewer_id.clone(),
                        from: publisher_id.clone(),
                    };
                    let _ = outbound_tx.send(OutboundSignal::Candidate(message));
                }
            }
        }
    })
}

#[cfg(test)]
#[path = "signaling_tests.rs"]
mod tests;
