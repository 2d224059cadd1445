//! Network I/O sampler.

use std::sync::Arc;

use crate::collector::SystemStats;
use crate::metrics::{MetricDesc, MetricRegistry};

use super::{SampleError, Sampler};

const NET_RECV: MetricDesc = MetricDesc::counter(
    "node_network_receive_bytes_total",
    "Total number of bytes received on network interface",
);
const NET_SENT: MetricDesc = MetricDesc::counter(
    "node_network_transmit_bytes_total",
    "Total number of bytes transmitted on network interface",
);

/// Samples cumulative byte counters for every interface present this cycle.
///
/// One sampler iterates the whole interface list per tick; interfaces that
/// appear later are picked up on their first tick of existence.
pub struct NetworkSampler {
    stats: Arc<dyn SystemStats>,
}

impl NetworkSampler {
    pub fn new(stats: Arc<dyn SystemStats>) -> Self {
        Self { stats }
    }
}

impl Sampler for NetworkSampler {
    fn family(&self) -> &'static str {
        "network"
    }

    fn sample(&mut self, registry: &MetricRegistry) -> Result<(), SampleError> {
        let interfaces = self.stats.net_io()?;

        let mut batch = registry.update();
        for i in &interfaces {
            let labels = [("interface", i.interface.as_str()), ("unit", "bytes")];
            batch.set_counter_total(&NET_RECV, &labels, i.recv_bytes as f64)?;
            batch.set_counter_total(&NET_SENT, &labels, i.sent_bytes as f64)?;
        }
        Ok(())
    }
}
