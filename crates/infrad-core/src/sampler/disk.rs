//! Filesystem capacity and disk I/O samplers.

use std::sync::Arc;

use crate::collector::SystemStats;
use crate::metrics::{MetricDesc, MetricRegistry};

use super::{SampleError, Sampler};

const FS_SIZE: MetricDesc =
    MetricDesc::gauge("node_filesystem_size_bytes", "Filesystem size in bytes");
const FS_AVAIL: MetricDesc = MetricDesc::gauge(
    "node_filesystem_avail_bytes",
    "Filesystem available space in bytes",
);
const DISK_READ: MetricDesc = MetricDesc::counter(
    "node_disk_read_bytes_total",
    "Total number of bytes read from disk",
);
const DISK_WRITTEN: MetricDesc = MetricDesc::counter(
    "node_disk_written_bytes_total",
    "Total number of bytes written to disk",
);

/// Samples mounted-filesystem capacity.
///
/// The mount table is a dynamic label set: the families are reset and
/// repopulated in one batch each cycle so unmounted filesystems drop out of
/// the next scrape.
pub struct FilesystemSampler {
    stats: Arc<dyn SystemStats>,
}

impl FilesystemSampler {
    pub fn new(stats: Arc<dyn SystemStats>) -> Self {
        Self { stats }
    }
}

impl Sampler for FilesystemSampler {
    fn family(&self) -> &'static str {
        "filesystem"
    }

    fn sample(&mut self, registry: &MetricRegistry) -> Result<(), SampleError> {
        let partitions = self.stats.partitions()?;

        let mut batch = registry.update();
        batch.reset_family("node_filesystem");
        for p in &partitions {
            let labels = [
                ("device", p.device.as_str()),
                ("fstype", p.fstype.as_str()),
                ("mountpoint", p.mountpoint.as_str()),
            ];
            batch.set_gauge(&FS_SIZE, &labels, p.total_bytes as f64)?;
            batch.set_gauge(&FS_AVAIL, &labels, p.avail_bytes as f64)?;
        }
        Ok(())
    }
}

/// Samples cumulative disk I/O byte counters per block device.
///
/// The source totals are already monotonic; they are written with a
/// non-decreasing clamp so a device reset never moves a counter backwards.
pub struct DiskIoSampler {
    stats: Arc<dyn SystemStats>,
}

impl DiskIoSampler {
    pub fn new(stats: Arc<dyn SystemStats>) -> Self {
        Self { stats }
    }
}

impl Sampler for DiskIoSampler {
    fn family(&self) -> &'static str {
        "disk_io"
    }

    fn sample(&mut self, registry: &MetricRegistry) -> Result<(), SampleError> {
        let devices = self.stats.disk_io()?;

        let mut batch = registry.update();
        for d in &devices {
            let labels = [("device", d.device.as_str())];
            batch.set_counter_total(&DISK_READ, &labels, d.read_bytes as f64)?;
            batch.set_counter_total(&DISK_WRITTEN, &labels, d.written_bytes as f64)?;
        }
        Ok(())
    }
}
