// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-bridge-session publisher identity, embedded in outgoing offers so
//! viewers can address their answers and candidates back (spec §4.7, GLOSSARY).

crate::define_id! {
    /// Identifies one signaling-bridge session. Generated fresh on every
    /// `Bridge::start`.
    pub struct PublisherId("pub-");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_has_prefix_and_is_unique() {
        let a = PublisherId::new();
        let b = PublisherId::new();
        assert!(a.as_str().starts_with("pub-"));
        assert_ne!(a, b);
    }

    #[test]
    fn roundtrips_through_json() {
        let id = PublisherId::new();
        let json = serde_json::to_string(&id).unwrap();
        let back: PublisherId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
