// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One viewer's signaling state plus the `JoinHandle` for its ICE-polling
//! task (spec §4.7). The record is `Arc<Mutex<_>>`-shared with the polling
//! task so both the synchronous join/answer/leave path and the
//! independently-running poller see the same dedup set.

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;
use vu_watchdog_core::ViewerRecord;

pub struct ViewerSession {
    pub record: Arc<Mutex<ViewerRecord>>,
    ice_poll_task: Option<JoinHandle<()>>,
}

impl ViewerSession {
    pub fn new(record: ViewerRecord) -> Self {
        Self { record: Arc::new(Mutex::new(record)), ice_poll_task: None }
    }

    pub fn set_ice_poll_task(&mut self, task: JoinHandle<()>) {
        self.stop_ice_polling();
        self.ice_poll_task = Some(task);
    }

    /// Aborts the ICE-polling task if one is running. Idempotent.
    pub fn stop_ice_polling(&mut self) {
        if let Some(task) = self.ice_poll_task.take() {
            task.abort();
        }
    }

    pub fn is_ice_polling_live(&self) -> bool {
        self.ice_poll_task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for ViewerSession {
    fn drop(&mut self) {
        self.stop_ice_polling();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn dropping_a_session_aborts_its_ice_poll_task() {
        let mut session = ViewerSession::new(ViewerRecord::new("viewer-1", "peer-1", 0));
        let task = tokio::spawn(async {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        });
        session.set_ice_poll_task(task);
        assert!(session.is_ice_polling_live());
        drop(session);
    }
}
