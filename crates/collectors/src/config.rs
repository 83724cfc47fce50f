// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Static configuration the collectors need to know what to probe. Resolved
//! from environment by the daemon crate (`vu_watchdog_daemon::env`) and
//! passed in here as plain data — the collectors never read env vars
//! themselves.

#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Process name substring identifying the target application (e.g.
    /// "vuos").
    pub app_process_name: String,
    /// Process name substring identifying the supporting local server.
    pub server_process_name: String,
    /// URL probed for internet reachability (HEAD request).
    pub internet_probe_url: String,
    /// URL probed for local-server reachability and connected-peer count
    /// (expects a JSON array response).
    pub local_server_url: String,
    /// Path to the app's lock/heartbeat file.
    pub lock_file_path: std::path::PathBuf,
    /// Path to the app's recent log file, tailed for error counts.
    pub log_file_path: std::path::PathBuf,
}

impl CollectorConfig {
    #[cfg(any(test, feature = "test-support"))]
    pub fn test_default() -> Self {
        Self {
            app_process_name: "vuos".to_string(),
            server_process_name: "vuos-server".to_string(),
            internet_probe_url: "https://connectivitycheck.example.com/generate_204".to_string(),
            local_server_url: "http://127.0.0.1:9000/peers".to_string(),
            lock_file_path: std::path::PathBuf::from("/tmp/vuos.lock"),
            log_file_path: std::path::PathBuf::from("/tmp/vuos.log"),
        }
    }
}
