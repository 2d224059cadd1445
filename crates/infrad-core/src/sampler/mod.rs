//! Periodic sampler jobs, one per metric family.
//!
//! Each sampler pulls a typed snapshot from its `SystemStats` source and
//! writes it into the registry as a single batch. The data-source call
//! happens before the batch is opened, so the registry lock is never held
//! across OS reads. A failed cycle leaves previously written values in
//! place.

mod cpu;
mod disk;
mod memory;
mod net;
mod process;

pub use cpu::CpuSampler;
pub use disk::{DiskIoSampler, FilesystemSampler};
pub use memory::MemorySampler;
pub use net::NetworkSampler;
pub use process::ProcessListSampler;

use std::fmt;

use crate::collector::StatsError;
use crate::metrics::{MetricRegistry, RegistryError};

/// Error from one sampling cycle.
///
/// The scheduler logs it and retries on the next tick; it never reaches a
/// scrape client.
#[derive(Debug)]
pub enum SampleError {
    /// The data source failed or returned malformed content.
    Stats(StatsError),
    /// A registry write was rejected.
    Registry(RegistryError),
}

impl fmt::Display for SampleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleError::Stats(e) => write!(f, "stats unavailable: {}", e),
            SampleError::Registry(e) => write!(f, "registry rejected update: {}", e),
        }
    }
}

impl std::error::Error for SampleError {}

impl From<StatsError> for SampleError {
    fn from(e: StatsError) -> Self {
        SampleError::Stats(e)
    }
}

impl From<RegistryError> for SampleError {
    fn from(e: RegistryError) -> Self {
        SampleError::Registry(e)
    }
}

/// A periodic job bound to one metric family and one data source.
pub trait Sampler: Send {
    /// Family tag used for logging and supervision.
    fn family(&self) -> &'static str;

    /// Runs one sampling cycle against the registry.
    fn sample(&mut self, registry: &MetricRegistry) -> Result<(), SampleError>;
}

#[cfg(test)]
pub(crate) mod testing {
    //! Stats stubs shared by sampler and scheduler tests.

    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::collector::{
        CpuTimes, DiskIo, MemoryInfo, NetIo, PartitionUsage, ProcessEntry, StatsError, SystemStats,
    };

    /// Returns the same fixed values on every call.
    #[derive(Debug, Default)]
    pub(crate) struct FixedStats;

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

    /// Delegates to `FixedStats` for the first `ok_calls` calls across all
    /// families, then fails every call.
    #[derive(Debug)]
    pub(crate) struct FlakyStats {
        calls: AtomicUsize,
        ok_calls: usize,
    }

    impl FlakyStats {
        pub(crate) fn new(ok_calls: usize) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                ok_calls,
            }
        }

        fn gate(&self) -> Result<FixedStats, StatsError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) < self.ok_calls {
                Ok(FixedStats)
            } else {
                Err(StatsError::Io(io::Error::other("stats source down")))
            }
        }
    }

    impl SystemStats for FlakyStats {
        fn cpu_times(&self) -> Result<Vec<CpuTimes>, StatsError> {
            self.gate()?.cpu_times()
        }

        fn memory(&self) -> Result<MemoryInfo, StatsError> {
            self.gate()?.memory()
        }

        fn partitions(&self) -> Result<Vec<PartitionUsage>, StatsError> {
            self.gate()?.partitions()
        }

        fn disk_io(&self) -> Result<Vec<DiskIo>, StatsError> {
            self.gate()?.disk_io()
        }

        fn net_io(&self) -> Result<Vec<NetIo>, StatsError> {
            self.gate()?.net_io()
        }

        fn processes(&self) -> Result<Vec<ProcessEntry>, StatsError> {
            self.gate()?.processes()
        }
    }
}
