//! Process table sampler.

use std::sync::Arc;

use crate::collector::SystemStats;
use crate::metrics::{MetricDesc, MetricRegistry};

use super::{SampleError, Sampler};

const PROCESS_LIST: MetricDesc = MetricDesc::gauge(
    "process_list",
    "List of processes running on the server",
);

/// Samples the process table as a presence-indicator gauge set.
///
/// PIDs are an inherently dynamic label set, so each cycle resets the
/// family and repopulates it in the same batch: processes that exited are
/// gone from the very next scrape, and a scrape can never observe the
/// family mid-rebuild.
pub struct ProcessListSampler {
    stats: Arc<dyn SystemStats>,
}

impl ProcessListSampler {
    pub fn new(stats: Arc<dyn SystemStats>) -> Self {
        Self { stats }
    }
}

impl Sampler for ProcessListSampler {
    fn family(&self) -> &'static str {
        "process_list"
    }

    fn sample(&mut self, registry: &MetricRegistry) -> Result<(), SampleError> {
        let processes = self.stats.processes()?;

        let mut batch = registry.update();
        batch.reset_family(PROCESS_LIST.name);
        for p in &processes {
            let pid = p.pid.to_string();
            batch.set_gauge(
                &PROCESS_LIST,
                &[("pid", pid.as_str()), ("name", p.name.as_str())],
                1.0,
            )?;
        }
        Ok(())
    }
}
