use super::*;
use crate::registry::CollectorHandle;
use vu_watchdog_core::{AppMetrics, GpuMetrics, SystemMetrics};

#[test]
fn assemble_reads_current_cache_values_with_no_io() {
    let system = CollectorHandle::new(SystemMetrics::nominal());
    let gpu = CollectorHandle::new(Some(GpuMetrics {
        name: "Test GPU".to_string(),
        usage_percent: 12.0,
        vram_used_mb: 100,
        vram_total_mb: 1000,
        temperature_c: 50.0,
    }));
    let network = CollectorHandle::new(NetworkMetrics::nominal());
    let app = CollectorHandle::new(AppMetrics::nominal());
    let registry = CollectorRegistry::from_handles(system, gpu, network, app);

    let assembler = Assembler::new("wall-1");
    let record = assembler.assemble(&registry, 12_345);

    assert_eq!(record.timestamp, 12_345);
    assert_eq!(record.wall_id, "wall-1");
    assert_eq!(record.system.gpu.as_ref().map(|g| g.name.as_str()), Some("Test GPU"));
    assert!(record.network.internet_reachable);
    assert!(record.app.app_running);
}

#[test]
fn assemble_merges_gpu_cache_into_system_metrics() {
    let system = CollectorHandle::new(SystemMetrics::baseline());
    let gpu = CollectorHandle::new(None);
    let network = CollectorHandle::new(NetworkMetrics::baseline());
    let app = CollectorHandle::new(AppMetrics::baseline());
    let registry = CollectorRegistry::from_handles(system, gpu, network, app);

    let assembler = Assembler::new("wall-1");
    let record = assembler.assemble(&registry, 0);

    assert!(record.system.gpu.is_none());
}
