use super::*;
use std::time::Duration;

#[test]
fn native_probe_reports_no_reading() {
    assert!(NativeVendorProbe.probe().is_none());
}

#[test]
fn os_fallback_probe_reports_no_reading() {
    assert!(OsFallbackProbe.probe().is_none());
}

#[tokio::test]
async fn run_gpu_loop_leaves_cache_at_none_absent_a_real_probe() {
    let handle = CollectorHandle::new(None);
    let task = tokio::spawn(run_gpu_loop(handle.clone()));

    tokio::time::sleep(Duration::from_millis(20)).await;
    task.abort();

    assert_eq!(handle.get(), None);
}
