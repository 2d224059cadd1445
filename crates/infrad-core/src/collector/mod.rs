//! OS counter acquisition.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────┐
//! │                SystemStats (trait)                │
//! │   cpu_times / memory / partitions / disk_io /     │
//! │   net_io / processes                              │
//! └─────────────────────────┬─────────────────────────┘
//!                           │
//!                  ┌────────▼────────┐
//!                  │    ProcStats    │  /proc/stat, meminfo,
//!                  │                 │  diskstats, net/dev,
//!                  └────────┬────────┘  mounts, [pid]/comm
//!                           │
//!                    ┌──────▼──────┐
//!                    │  FileSystem │ (trait)
//!                    └──────┬──────┘
//!                           │
//!              ┌────────────┴────────────┐
//!       ┌──────▼──────┐           ┌──────▼──────┐
//!       │   RealFs    │           │   MockFs    │
//!       │  (Linux)    │           │ (testing)   │
//!       └─────────────┘           └─────────────┘
//! ```
//!
//! Samplers depend on `SystemStats` only; tests substitute a stub or run
//! `ProcStats` against `MockFs::typical_system()`.

pub mod mock;
pub mod procfs;
mod stats;
mod traits;

pub use mock::MockFs;
pub use procfs::ProcStats;
pub use stats::{
    CpuTimes, DiskIo, MemoryInfo, NetIo, PartitionUsage, ProcessEntry, StatsError, SystemStats,
};
pub use traits::{FileSystem, FsUsage, RealFs};
