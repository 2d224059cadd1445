//! Metric instruments, registry, and text exposition.
//!
//! The registry is the single source of truth for every exported value.
//! Samplers write through it, the scrape endpoint reads through it, and no
//! component holds private metric state that could drift from what a scrape
//! observes.

mod exposition;
mod registry;

pub use exposition::{CONTENT_TYPE, render_text};
pub use registry::{MetricBatch, MetricFamilySample, MetricRegistry, MetricSample};

use std::fmt;

/// Kind of a metric instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// Instantaneous measurement, may move in either direction.
    Gauge,
    /// Monotonically non-decreasing cumulative total.
    Counter,
}

impl MetricKind {
    /// Keyword used on the exposition `# TYPE` line.
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Gauge => "gauge",
            MetricKind::Counter => "counter",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static description of a metric family: wire name, help text, kind.
///
/// Samplers declare these as consts and pass them to every registry write,
/// which is what lets the exposition emit `# HELP` and `# TYPE` lines.
#[derive(Debug, Clone, Copy)]
pub struct MetricDesc {
    pub name: &'static str,
    pub help: &'static str,
    pub kind: MetricKind,
}

impl MetricDesc {
    pub const fn gauge(name: &'static str, help: &'static str) -> Self {
        Self {
            name,
            help,
            kind: MetricKind::Gauge,
        }
    }

    pub const fn counter(name: &'static str, help: &'static str) -> Self {
        Self {
            name,
            help,
            kind: MetricKind::Counter,
        }
    }
}

/// Identity of a single instrument: family name plus a label set.
///
/// Labels are stored sorted by key, so two identities are equal iff the
/// name and the full label set match, regardless of construction order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MetricId {
    name: String,
    labels: Vec<(String, String)>,
}

impl MetricId {
    /// Builds a validated identity.
    ///
    /// Rejects empty names, empty label keys, and duplicate label keys with
    /// `RegistryError::InvalidIdentity`.
    pub fn new(name: &str, labels: &[(&str, &str)]) -> Result<Self, RegistryError> {
        if name.is_empty() {
            return Err(RegistryError::InvalidIdentity(
                "empty metric name".to_string(),
            ));
        }
        let mut sorted: Vec<(String, String)> = labels
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));
        if sorted.iter().any(|(k, _)| k.is_empty()) {
            return Err(RegistryError::InvalidIdentity(format!(
                "empty label key on metric '{}'",
                name
            )));
        }
        for pair in sorted.windows(2) {
            if pair[0].0 == pair[1].0 {
                return Err(RegistryError::InvalidIdentity(format!(
                    "duplicate label key '{}' on metric '{}'",
                    pair[0].0, name
                )));
            }
        }
        Ok(Self {
            name: name.to_string(),
            labels: sorted,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Label pairs, sorted by key.
    pub fn labels(&self) -> &[(String, String)] {
        &self.labels
    }
}

/// Error type for registry operations.
///
/// Registry operations never fail on valid input; every variant here is a
/// caller bug surfaced at the boundary instead of being silently coerced.
#[derive(Debug)]
pub enum RegistryError {
    /// Malformed metric identity (empty name, empty or duplicate label keys).
    InvalidIdentity(String),
    /// Operation kind does not match the family's registered kind.
    KindMismatch {
        name: String,
        family: MetricKind,
        operation: MetricKind,
    },
    /// Negative delta passed to a counter.
    NegativeDelta { name: String, delta: f64 },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::InvalidIdentity(msg) => write!(f, "invalid metric identity: {}", msg),
            RegistryError::KindMismatch {
                name,
                family,
                operation,
            } => write!(
                f,
                "kind mismatch on metric '{}': family is {}, operation expects {}",
                name, family, operation
            ),
            RegistryError::NegativeDelta { name, delta } => {
                write!(f, "negative delta {} for counter '{}'", delta, name)
            }
        }
    }
}

impl std::error::Error for RegistryError {}
