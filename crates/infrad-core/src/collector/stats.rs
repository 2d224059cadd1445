//! Typed snapshots of OS resource counters and the capability trait the
//! samplers consume.

use std::fmt;
use std::io;

/// Per-core CPU time breakdown, in seconds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CpuTimes {
    /// Core identifier as exposed on the wire, e.g. "cpu0".
    pub cpu: String,
    pub user: f64,
    pub nice: f64,
    pub system: f64,
    pub idle: f64,
    pub iowait: f64,
    pub irq: f64,
    pub softirq: f64,
    pub steal: f64,
    pub guest: f64,
    pub guest_nice: f64,
}

impl CpuTimes {
    /// Sum of all accounted time components.
    pub fn total(&self) -> f64 {
        self.user
            + self.nice
            + self.system
            + self.idle
            + self.iowait
            + self.irq
            + self.softirq
            + self.steal
            + self.guest
            + self.guest_nice
    }
}

/// Virtual memory and swap totals, in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryInfo {
    pub total: u64,
    pub available: u64,
    pub used: u64,
    pub buffers: u64,
    pub cached: u64,
    pub swap_total: u64,
    pub swap_free: u64,
}

/// A mounted filesystem with capacity figures, in bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionUsage {
    pub device: String,
    pub fstype: String,
    pub mountpoint: String,
    pub total_bytes: u64,
    pub avail_bytes: u64,
}

/// Cumulative I/O byte counters for one block device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiskIo {
    pub device: String,
    pub read_bytes: u64,
    pub written_bytes: u64,
}

/// Cumulative byte counters for one network interface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetIo {
    pub interface: String,
    pub recv_bytes: u64,
    pub sent_bytes: u64,
}

/// One row of the process table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessEntry {
    pub pid: u32,
    pub name: String,
}

/// Error type for stat acquisition failures.
///
/// Always transient: the sampler skips the cycle, keeps the previously
/// written values, and retries on the next tick. Never reaches a scrape.
#[derive(Debug)]
pub enum StatsError {
    /// I/O error reading a counter source.
    Io(io::Error),
    /// Malformed counter source content.
    Parse(String),
}

impl fmt::Display for StatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatsError::Io(e) => write!(f, "I/O error: {}", e),
            StatsError::Parse(msg) => write!(f, "parse error: {}", msg),
        }
    }
}

impl std::error::Error for StatsError {}

impl From<io::Error> for StatsError {
    fn from(e: io::Error) -> Self {
        StatsError::Io(e)
    }
}

/// Capability that supplies OS counter snapshots.
///
/// One call per family per sampling cycle; each call re-reads the source,
/// so a changing partition or interface list is picked up on the next tick.
pub trait SystemStats: Send + Sync {
    fn cpu_times(&self) -> Result<Vec<CpuTimes>, StatsError>;

    fn memory(&self) -> Result<MemoryInfo, StatsError>;

    fn partitions(&self) -> Result<Vec<PartitionUsage>, StatsError>;

    fn disk_io(&self) -> Result<Vec<DiskIo>, StatsError>;

    fn net_io(&self) -> Result<Vec<NetIo>, StatsError>;

    fn processes(&self) -> Result<Vec<ProcessEntry>, StatsError>;
}
