//! Memory and swap sampler.

use std::sync::Arc;

use crate::collector::SystemStats;
use crate::metrics::{MetricDesc, MetricRegistry};

use super::{SampleError, Sampler};

const TOTAL_MEMORY: MetricDesc = MetricDesc::gauge("total_memory", "Total memory available");
const FREE_MEMORY: MetricDesc = MetricDesc::gauge("free_memory", "Free memory available");
const USED_MEMORY: MetricDesc = MetricDesc::gauge("used_memory", "Used memory");
const MEM_TOTAL: MetricDesc = MetricDesc::gauge(
    "node_memory_MemTotal_bytes",
    "Total amount of memory in bytes.",
);
const MEM_AVAILABLE: MetricDesc = MetricDesc::gauge(
    "node_memory_MemAvailable_bytes",
    "Amount of available memory in bytes.",
);
const MEM_BUFFERS: MetricDesc = MetricDesc::gauge(
    "node_memory_Buffers_bytes",
    "Buffer memory usage in bytes",
);
const MEM_CACHED: MetricDesc = MetricDesc::gauge(
    "node_memory_Cached_bytes",
    "Cached memory usage in bytes",
);
const SWAP_TOTAL: MetricDesc = MetricDesc::gauge(
    "node_memory_SwapTotal_bytes",
    "Total swap memory available in bytes",
);
const SWAP_FREE: MetricDesc = MetricDesc::gauge(
    "node_memory_SwapFree_bytes",
    "Free swap memory available in bytes",
);

const UNIT_BYTES: [(&str, &str); 1] = [("unit", "bytes")];

/// Samples virtual memory and swap totals.
pub struct MemorySampler {
    stats: Arc<dyn SystemStats>,
}

impl MemorySampler {
    pub fn new(stats: Arc<dyn SystemStats>) -> Self {
        Self { stats }
    }
}

impl Sampler for MemorySampler {
    fn family(&self) -> &'static str {
        "memory"
    }

    fn sample(&mut self, registry: &MetricRegistry) -> Result<(), SampleError> {
        let mem = self.stats.memory()?;

        let mut batch = registry.update();
        batch.set_gauge(&TOTAL_MEMORY, &[], mem.total as f64)?;
        batch.set_gauge(&FREE_MEMORY, &[], mem.available as f64)?;
        batch.set_gauge(&USED_MEMORY, &[], mem.used as f64)?;
        batch.set_gauge(&MEM_TOTAL, &UNIT_BYTES, mem.total as f64)?;
        batch.set_gauge(&MEM_AVAILABLE, &UNIT_BYTES, mem.available as f64)?;
        batch.set_gauge(&MEM_BUFFERS, &UNIT_BYTES, mem.buffers as f64)?;
        batch.set_gauge(&MEM_CACHED, &UNIT_BYTES, mem.cached as f64)?;
        batch.set_gauge(&SWAP_TOTAL, &UNIT_BYTES, mem.swap_total as f64)?;
        batch.set_gauge(&SWAP_FREE, &UNIT_BYTES, mem.swap_free as f64)?;
        Ok(())
    }
}
