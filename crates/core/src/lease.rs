// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Exclusive command authorization lease (spec §4.5).
//!
//! At most one owner may hold the lease at a time. A lease request from a
//! new owner while the current lease is still active is rejected; once it
//! expires, any owner may acquire it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lease {
    pub owner: String,
    #[serde(rename = "expiresTs")]
    pub expires_ts: u64,
}

impl Lease {
    pub fn is_active(&self, now_ms: u64) -> bool {
        now_ms < self.expires_ts
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaseDecision {
    Granted,
    Denied,
}

#[derive(Default)]
pub struct LeaseManager {
    current: Option<Lease>,
}

impl LeaseManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Lease> {
        self.current.as_ref()
    }

    /// Attempt to (re-)acquire the lease for `owner`, holding it until
    /// `now_ms + duration_ms`. Granted if there is no current lease, the
    /// current lease has expired, or `owner` already holds it (renewal).
    pub fn acquire(&mut self, owner: impl Into<String>, duration_ms: u64, now_ms: u64) -> LeaseDecision {
        let owner = owner.into();
        let grant = match &self.current {
            None => true,
            Some(lease) => !lease.is_active(now_ms) || lease.owner == owner,
        };

        if grant {
            self.current = Some(Lease { owner, expires_ts: now_ms + duration_ms });
            LeaseDecision::Granted
        } else {
            LeaseDecision::Denied
        }
    }

    /// Like [`LeaseManager::acquire`], but takes the lease's absolute expiry
    /// straight from the caller rather than deriving it from a duration.
    /// Used for the `lease` topic, whose wire payload carries `expiresTs`
    /// directly (spec's lease update rule: the stored expiry is the
    /// payload's expiry, not a locally recomputed one).
    pub fn acquire_with_expiry(&mut self, owner: impl Into<String>, expires_ts: u64, now_ms: u64) -> LeaseDecision {
        let owner = owner.into();
        let grant = match &self.current {
            None => true,
            Some(lease) => !lease.is_active(now_ms) || lease.owner == owner,
        };

        if grant {
            self.current = Some(Lease { owner, expires_ts });
            LeaseDecision::Granted
        } else {
            LeaseDecision::Denied
        }
    }

    /// Whether a command from `owner` is authorized to proceed: either the
    /// command doesn't require a lease, or `owner` holds an active one.
    pub fn validate(&self, owner: &str, requires_lease: bool, now_ms: u64) -> bool {
        if !requires_lease {
            return true;
        }
        matches!(&self.current, Some(lease) if lease.owner == owner && lease.is_active(now_ms))
    }

    /// Drop an expired lease, freeing it up for a new owner. A no-op if the
    /// current lease (if any) is still active.
    pub fn reap_if_expired(&mut self, now_ms: u64) {
        if matches!(&self.current, Some(lease) if !lease.is_active(now_ms)) {
            self.current = None;
        }
    }
}

#[cfg(test)]
#[path = "lease_tests.rs"]
mod tests;
