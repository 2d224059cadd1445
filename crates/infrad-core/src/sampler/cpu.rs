//! CPU time and usage sampler.

use std::sync::Arc;

use crate::collector::SystemStats;
use crate::metrics::{MetricDesc, MetricRegistry};

use super::{SampleError, Sampler};

const CPU_MODE: MetricDesc = MetricDesc::gauge("node_cpu_seconds", "CPU seconds by mode");
const CPU_USAGE: MetricDesc = MetricDesc::gauge("node_cpu_seconds_total", "CPU usage percentage");
const CPU_IDLE: MetricDesc = MetricDesc::gauge("cpu_idle", "CPU idle percentage");

/// Samples per-core CPU time by mode and derives overall usage and idle
/// percentages across all cores. Totals are recomputed every cycle.
pub struct CpuSampler {
    stats: Arc<dyn SystemStats>,
}

impl CpuSampler {
    pub fn new(stats: Arc<dyn SystemStats>) -> Self {
        Self { stats }
    }
}

impl Sampler for CpuSampler {
    fn family(&self) -> &'static str {
        "cpu"
    }

    fn sample(&mut self, registry: &MetricRegistry) -> Result<(), SampleError> {
        let times = self.stats.cpu_times()?;

        let mut total = 0.0;
        let mut idle = 0.0;
        for t in &times {
            total += t.total();
            idle += t.idle;
        }
        let (usage_pct, idle_pct) = usage_percent(total, idle);

        let mut batch = registry.update();
        for t in &times {
            for (mode, value) in [
                ("idle", t.idle),
                ("iowait", t.iowait),
                ("irq", t.irq),
                ("nice", t.nice),
                ("softirq", t.softirq),
                ("steal", t.steal),
                ("system", t.system),
                ("user", t.user),
            ] {
                batch.set_gauge(&CPU_MODE, &[("cpu", t.cpu.as_str()), ("mode", mode)], value)?;
            }
        }
        batch.set_gauge(&CPU_USAGE, &[], usage_pct)?;
        batch.set_gauge(&CPU_IDLE, &[], idle_pct)?;
        Ok(())
    }
}

/// usage% = 100 × (total − idle) / total. A zero total reports 0% usage
/// rather than dividing by zero.
fn usage_percent(total: f64, idle: f64) -> (f64, f64) {
    if total <= 0.0 {
        return (0.0, 100.0);
    }
    let usage = 100.0 * (total - idle) / total;
    (usage, 100.0 - usage)
}

#[cfg(test)]
mod tests {
    use super::super::testing::FixedStats;
    use super::*;

    #[test]
    fn test_usage_percent() {
        assert_eq!(usage_percent(100.0, 30.0), (70.0, 30.0));
        assert_eq!(usage_percent(0.0, 0.0), (0.0, 100.0));
    }

    #[test]
    fn test_sample_writes_modes_and_totals() {
        let registry = MetricRegistry::new();
        let mut sampler = CpuSampler::new(Arc::new(FixedStats));
        sampler.sample(&registry).unwrap();

        let snap = registry.snapshot();
        let modes = snap.iter().find(|f| f.name == "node_cpu_seconds").unwrap();
        assert_eq!(modes.samples.len(), 8);
        let user = modes
            .samples
            .iter()
            .find(|s| s.labels.contains(&("mode".to_string(), "user".to_string())))
            .unwrap();
        assert_eq!(user.value, 40.0);

        let usage = snap.iter().find(|f| f.name == "node_cpu_seconds_total").unwrap();
        assert_eq!(usage.samples[0].value, 70.0);
        let idle = snap.iter().find(|f| f.name == "cpu_idle").unwrap();
        assert_eq!(idle.samples[0].value, 30.0);
    }
}
