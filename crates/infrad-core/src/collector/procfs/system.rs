//! procfs-backed implementation of the `SystemStats` capability.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::parser;
use crate::collector::stats::{
    CpuTimes, DiskIo, MemoryInfo, NetIo, PartitionUsage, ProcessEntry, StatsError, SystemStats,
};
use crate::collector::traits::FileSystem;

/// Clock ticks per second (USER_HZ). Standard value for Linux.
const CLK_TCK: f64 = 100.0;

/// Sector unit used by `/proc/diskstats`, independent of device geometry.
const SECTOR_SIZE: u64 = 512;

/// `SystemStats` provider reading the Linux `/proc` filesystem.
///
/// Every call re-reads its source file, so partition, interface, and
/// process lists reflect the state at that cycle.
pub struct ProcStats<F: FileSystem> {
    fs: F,
    proc_path: PathBuf,
}

impl<F: FileSystem> ProcStats<F> {
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `proc_path` - Base path to the proc filesystem (usually "/proc")
    pub fn new(fs: F, proc_path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            proc_path: proc_path.into(),
        }
    }

    fn read(&self, rel: &str) -> Result<String, StatsError> {
        Ok(self.fs.read_to_string(&self.proc_path.join(rel))?)
    }
}

impl<F: FileSystem + Send + Sync> SystemStats for ProcStats<F> {
    fn cpu_times(&self) -> Result<Vec<CpuTimes>, StatsError> {
        let content = self.read("stat")?;
        let ticks = parser::parse_cpu_ticks(&content).map_err(|e| StatsError::Parse(e.message))?;
        Ok(ticks
            .into_iter()
            .filter_map(|t| {
                // Per-core lines only; the aggregate "cpu" line is derived
                // by the consumer.
                let id = t.cpu_id?;
                Some(CpuTimes {
                    cpu: format!("cpu{}", id),
                    user: t.user as f64 / CLK_TCK,
                    nice: t.nice as f64 / CLK_TCK,
                    system: t.system as f64 / CLK_TCK,
                    idle: t.idle as f64 / CLK_TCK,
                    iowait: t.iowait as f64 / CLK_TCK,
                    irq: t.irq as f64 / CLK_TCK,
                    softirq: t.softirq as f64 / CLK_TCK,
                    steal: t.steal as f64 / CLK_TCK,
                    guest: t.guest as f64 / CLK_TCK,
                    guest_nice: t.guest_nice as f64 / CLK_TCK,
                })
            })
            .collect())
    }

    fn memory(&self) -> Result<MemoryInfo, StatsError> {
        let content = self.read("meminfo")?;
        let info = parser::parse_meminfo(&content).map_err(|e| StatsError::Parse(e.message))?;

        let total = info.mem_total * 1024;
        let free = info.mem_free * 1024;
        let available = info.mem_available * 1024;
        let buffers = info.buffers * 1024;
        let cached = info.cached * 1024;
        Ok(MemoryInfo {
            total,
            available,
            used: total.saturating_sub(free + buffers + cached),
            buffers,
            cached,
            swap_total: info.swap_total * 1024,
            swap_free: info.swap_free * 1024,
        })
    }

    fn partitions(&self) -> Result<Vec<PartitionUsage>, StatsError> {
        let content = self.read("mounts")?;
        let mounts = parser::parse_mounts(&content).map_err(|e| StatsError::Parse(e.message))?;

        let mut partitions = Vec::new();
        for mount in mounts {
            // Physical block devices only; proc, sysfs, tmpfs and friends
            // carry no capacity worth reporting.
            if !mount.device.starts_with("/dev/") {
                continue;
            }
            match self.fs.usage(Path::new(&mount.mountpoint)) {
                Ok(usage) => partitions.push(PartitionUsage {
                    device: mount.device,
                    fstype: mount.fstype,
                    mountpoint: mount.mountpoint,
                    total_bytes: usage.total_bytes,
                    avail_bytes: usage.avail_bytes,
                }),
                Err(e) => {
                    debug!(mountpoint = %mount.mountpoint, error = %e, "statvfs failed, skipping mount");
                }
            }
        }
        Ok(partitions)
    }

    fn disk_io(&self) -> Result<Vec<DiskIo>, StatsError> {
        let content = self.read("diskstats")?;
        let devices = parser::parse_diskstats(&content).map_err(|e| StatsError::Parse(e.message))?;
        Ok(devices
            .into_iter()
            .map(|d| DiskIo {
                device: d.name,
                read_bytes: d.read_sectors * SECTOR_SIZE,
                written_bytes: d.written_sectors * SECTOR_SIZE,
            })
            .collect())
    }

    fn net_io(&self) -> Result<Vec<NetIo>, StatsError> {
        let content = self.read("net/dev")?;
        let interfaces = parser::parse_netdev(&content).map_err(|e| StatsError::Parse(e.message))?;
        Ok(interfaces
            .into_iter()
            .map(|i| NetIo {
                interface: i.interface,
                recv_bytes: i.recv_bytes,
                sent_bytes: i.sent_bytes,
            })
            .collect())
    }

    fn processes(&self) -> Result<Vec<ProcessEntry>, StatsError> {
        let entries = self.fs.read_dir(&self.proc_path)?;

        let mut processes = Vec::new();
        for entry in entries {
            let Some(name) = entry.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Ok(pid) = name.parse::<u32>() else {
                continue;
            };
            // Processes may exit between the directory listing and the comm
            // read; those are skipped, not errors.
            let Ok(comm) = self.fs.read_to_string(&entry.join("comm")) else {
                continue;
            };
            let comm = comm.trim();
            if comm.is_empty() {
                continue;
            }
            processes.push(ProcessEntry {
                pid,
                name: comm.to_string(),
            });
        }
        processes.sort_by_key(|p| p.pid);
        Ok(processes)
    }
}
