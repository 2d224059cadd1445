//! End-to-end: a stub stats provider, the full sampler set on the
//! scheduler, and the rendered exposition after one sampling interval.

use std::sync::Arc;
use std::time::Duration;

use infrad_core::collector::{
    CpuTimes, DiskIo, MemoryInfo, NetIo, PartitionUsage, ProcessEntry, StatsError, SystemStats,
};
use infrad_core::metrics::{MetricRegistry, render_text};
use infrad_core::sampler::{
    CpuSampler, DiskIoSampler, FilesystemSampler, MemorySampler, NetworkSampler,
    ProcessListSampler,
};
use infrad_core::scheduler::{Scheduler, TaskConfig};

struct FixedStats;

impl SystemStats for FixedStats {
    fn cpu_times(&self) -> Result<Vec<CpuTimes>, StatsError> {
        Ok(vec![CpuTimes {
            cpu: "cpu0".to_string(),
            user: 40.0,
            nice: 0.0,
            system: 20.0,
            idle: 30.0,
            iowait: 10.0,
            irq: 0.0,
            softirq: 0.0,
            steal: 0.0,
            guest: 0.0,
            guest_nice: 0.0,
        }])
    }

    fn memory(&self) -> Result<MemoryInfo, StatsError> {
        Ok(MemoryInfo {
            total: 1000,
            available: 600,
            used: 300,
            buffers: 50,
            cached: 50,
            swap_total: 200,
            swap_free: 150,
        })
    }

    fn partitions(&self) -> Result<Vec<PartitionUsage>, StatsError> {
        Ok(vec![PartitionUsage {
            device: "/dev/sda1".to_string(),
            fstype: "ext4".to_string(),
            mountpoint: "/".to_string(),
            total_bytes: 5000,
            avail_bytes: 2000,
        }])
    }

    fn disk_io(&self) -> Result<Vec<DiskIo>, StatsError> {
        Ok(vec![DiskIo {
            device: "sda".to_string(),
            read_bytes: 1111,
            written_bytes: 2222,
        }])
    }

    fn net_io(&self) -> Result<Vec<NetIo>, StatsError> {
        Ok(vec![NetIo {
            interface: "eth0".to_string(),
            recv_bytes: 3333,
            sent_bytes: 4444,
        }])
    }

    fn processes(&self) -> Result<Vec<ProcessEntry>, StatsError> {
        Ok(vec![
            ProcessEntry {
                pid: 1,
                name: "init".to_string(),
            },
            ProcessEntry {
                pid: 42,
                name: "sshd".to_string(),
            },
        ])
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn scrape_after_one_interval_reports_fixed_values() {
    let registry = Arc::new(MetricRegistry::new());
    let stats: Arc<dyn SystemStats> = Arc::new(FixedStats);

    let mut scheduler = Scheduler::new(Arc::clone(&registry));
    let config = TaskConfig::new(Duration::from_millis(10));
    scheduler.spawn(Box::new(CpuSampler::new(Arc::clone(&stats))), config);
    scheduler.spawn(Box::new(MemorySampler::new(Arc::clone(&stats))), config);
    scheduler.spawn(Box::new(FilesystemSampler::new(Arc::clone(&stats))), config);
    scheduler.spawn(Box::new(DiskIoSampler::new(Arc::clone(&stats))), config);
    scheduler.spawn(Box::new(NetworkSampler::new(Arc::clone(&stats))), config);
    scheduler.spawn(Box::new(ProcessListSampler::new(Arc::clone(&stats))), config);

    tokio::time::sleep(Duration::from_millis(100)).await;

    let body = render_text(&registry.snapshot());
    scheduler.shutdown().await;

    // CPU: total = 100s, idle = 30s.
    assert!(body.contains("# TYPE node_cpu_seconds gauge"));
    assert!(body.contains("node_cpu_seconds{cpu=\"cpu0\",mode=\"user\"} 40\n"));
    assert!(body.contains("node_cpu_seconds{cpu=\"cpu0\",mode=\"idle\"} 30\n"));
    assert!(body.contains("node_cpu_seconds_total 70\n"));
    assert!(body.contains("cpu_idle 30\n"));

    assert!(body.contains("total_memory 1000\n"));
    assert!(body.contains("free_memory 600\n"));
    assert!(body.contains("used_memory 300\n"));
    assert!(body.contains("node_memory_MemTotal_bytes{unit=\"bytes\"} 1000\n"));
    assert!(body.contains("node_memory_SwapFree_bytes{unit=\"bytes\"} 150\n"));

    assert!(body.contains(
        "node_filesystem_size_bytes{device=\"/dev/sda1\",fstype=\"ext4\",mountpoint=\"/\"} 5000\n"
    ));
    assert!(body.contains(
        "node_filesystem_avail_bytes{device=\"/dev/sda1\",fstype=\"ext4\",mountpoint=\"/\"} 2000\n"
    ));

    assert!(body.contains("# TYPE node_disk_read_bytes_total counter"));
    assert!(body.contains("node_disk_read_bytes_total{device=\"sda\"} 1111\n"));
    assert!(body.contains("node_disk_written_bytes_total{device=\"sda\"} 2222\n"));

    assert!(body.contains(
        "node_network_receive_bytes_total{interface=\"eth0\",unit=\"bytes\"} 3333\n"
    ));
    assert!(body.contains(
        "node_network_transmit_bytes_total{interface=\"eth0\",unit=\"bytes\"} 4444\n"
    ));

    assert!(body.contains("process_list{name=\"init\",pid=\"1\"} 1\n"));
    assert!(body.contains("process_list{name=\"sshd\",pid=\"42\"} 1\n"));
}

/// Scrapes taken while samplers are mid-flight must stay internally
/// consistent: the process family is always complete.
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_scrapes_see_complete_families() {
    let registry = Arc::new(MetricRegistry::new());
    let stats: Arc<dyn SystemStats> = Arc::new(FixedStats);

    let mut scheduler = Scheduler::new(Arc::clone(&registry));
    scheduler.spawn(
        Box::new(ProcessListSampler::new(Arc::clone(&stats))),
        TaskConfig::new(Duration::from_millis(1)),
    );

    for _ in 0..200 {
        let snap = registry.snapshot();
        if let Some(fam) = snap.iter().find(|f| f.name == "process_list") {
            assert_eq!(fam.samples.len(), 2, "family observed mid-rebuild");
        }
        tokio::task::yield_now().await;
    }

    scheduler.shutdown().await;
}
