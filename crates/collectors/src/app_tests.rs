use super::*;
use std::io::Write;

#[test]
fn crash_tracker_counts_pid_changes_not_disappearances() {
    let mut tracker = CrashTracker::new();
    assert_eq!(tracker.observe(Some(100)), 0);
    assert_eq!(tracker.observe(None), 0, "disappearance alone is not a crash");
    assert_eq!(tracker.observe(Some(100)), 0, "same pid reappearing is not a crash");
    assert_eq!(tracker.observe(Some(200)), 1, "a different pid is a crash");
    assert_eq!(tracker.observe(Some(200)), 1);
    assert_eq!(tracker.observe(Some(300)), 2);
}

#[test]
fn read_lock_file_reports_absent_when_missing() {
    let record = read_lock_file(Path::new("/nonexistent/vu-watchdog-test.lock"));
    assert!(record.pid.is_none());
    assert!(record.healthy);
}

#[test]
fn read_lock_file_parses_valid_json() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("vuos.lock");
    let now_ms = chrono::Utc::now().timestamp_millis();
    std::fs::write(
        &path,
        format!(r#"{{"pid":42,"startTime":{now_ms},"lastHeartbeat":{now_ms}}}"#),
    )
    .expect("write lock file");

    let record = read_lock_file(&path);
    assert_eq!(record.pid, Some(42));
    assert!(record.healthy);
}

#[test]
fn read_lock_file_marks_stale_heartbeat_unhealthy() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("vuos.lock");
    let stale_heartbeat = chrono::Utc::now().timestamp_millis() - 60_000;
    std::fs::write(
        &path,
        format!(r#"{{"pid":42,"startTime":0,"lastHeartbeat":{stale_heartbeat}}}"#),
    )
    .expect("write lock file");

    let record = read_lock_file(&path);
    assert!(!record.healthy);
}

#[test]
fn read_log_summary_counts_recent_errors() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("vuos.log");
    let mut file = std::fs::File::create(&path).expect("create log file");
    writeln!(file, "INFO starting up").expect("write");
    writeln!(file, "ERROR failed to connect").expect("write");
    writeln!(file, "ERROR retry failed").expect("write");
    writeln!(file, "INFO retry succeeded").expect("write");
    drop(file);

    let summary = read_log_summary(&path);
    assert_eq!(summary.recent_count, 2);
    assert_eq!(summary.last_message.as_deref(), Some("INFO retry succeeded"));
}

#[test]
fn read_log_summary_reports_empty_when_missing() {
    let summary = read_log_summary(Path::new("/nonexistent/vu-watchdog-test.log"));
    assert_eq!(summary.recent_count, 0);
    assert!(summary.last_message.is_none());
}
