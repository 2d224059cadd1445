//! Process-wide metric registry.
//!
//! All mutation goes through a [`MetricBatch`], which holds the write lock
//! for the duration of one sampler cycle's in-memory updates. A scrape
//! therefore observes each family either entirely before or entirely after
//! a cycle — a reset-then-repopulate sequence can never be seen half done.
//!
//! The lock is never held across data-source I/O: samplers read the OS
//! first and only then open a batch, so a scrape is never stalled behind a
//! slow `/proc` read.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockWriteGuard};

use super::{MetricDesc, MetricId, MetricKind, RegistryError};

#[derive(Debug, Clone, Copy)]
struct FamilyMeta {
    kind: MetricKind,
    help: &'static str,
}

#[derive(Debug, Default)]
struct RegistryInner {
    /// Family name -> kind and help. Families are created on first touch.
    families: BTreeMap<String, FamilyMeta>,
    /// One value per identity. The BTreeMap keeps exposition order stable:
    /// by family name, then by label set.
    instruments: BTreeMap<MetricId, f64>,
}

/// Shared registry of named, labeled metric instruments.
///
/// The registry is the only shared mutable resource of the agent; wrap it
/// in an `Arc` and hand clones to the samplers and the scrape endpoint.
#[derive(Debug, Default)]
pub struct MetricRegistry {
    inner: RwLock<RegistryInner>,
}

/// One sample inside a family snapshot: a label set and its value.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub labels: Vec<(String, String)>,
    pub value: f64,
}

/// Point-in-time copy of one family with all of its samples.
#[derive(Debug, Clone)]
pub struct MetricFamilySample {
    pub name: String,
    pub help: &'static str,
    pub kind: MetricKind,
    pub samples: Vec<MetricSample>,
}

impl MetricRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a write batch.
    ///
    /// Every mutation applied through the returned batch becomes visible to
    /// `snapshot` at once, when the batch drops. Batches must only perform
    /// in-memory updates; fetch from the data source before opening one.
    pub fn update(&self) -> MetricBatch<'_> {
        MetricBatch {
            inner: self.inner.write().unwrap_or_else(PoisonError::into_inner),
        }
    }

    /// Returns a consistent point-in-time copy of every non-empty family,
    /// ordered by family name and label set.
    ///
    /// Concurrent snapshots are independent; none observes a half-applied
    /// batch.
    pub fn snapshot(&self) -> Vec<MetricFamilySample> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let mut out: Vec<MetricFamilySample> = Vec::with_capacity(inner.families.len());
        for (id, value) in &inner.instruments {
            let sample = MetricSample {
                labels: id.labels().to_vec(),
                value: *value,
            };
            match out.last_mut() {
                Some(family) if family.name == id.name() => family.samples.push(sample),
                _ => {
                    let meta = inner.families[id.name()];
                    out.push(MetricFamilySample {
                        name: id.name().to_string(),
                        help: meta.help,
                        kind: meta.kind,
                        samples: vec![sample],
                    });
                }
            }
        }
        out
    }
}

/// Write batch over the registry.
///
/// Holds the registry write lock; drop it promptly.
pub struct MetricBatch<'a> {
    inner: RwLockWriteGuard<'a, RegistryInner>,
}

impl MetricBatch<'_> {
    /// Idempotent lookup-or-create with zero initial value.
    ///
    /// Returns `KindMismatch` if the family already exists with a different
    /// kind; an existing instrument's value is left untouched.
    pub fn get_or_create(
        &mut self,
        desc: &MetricDesc,
        labels: &[(&str, &str)],
    ) -> Result<(), RegistryError> {
        let id = self.touch_family(desc, labels)?;
        self.inner.instruments.entry(id).or_insert(0.0);
        Ok(())
    }

    /// Overwrites a gauge value. Illegal on counter families.
    pub fn set_gauge(
        &mut self,
        desc: &MetricDesc,
        labels: &[(&str, &str)],
        value: f64,
    ) -> Result<(), RegistryError> {
        self.require_kind(desc, MetricKind::Gauge)?;
        let id = self.touch_family(desc, labels)?;
        self.inner.instruments.insert(id, value);
        Ok(())
    }

    /// Adds a non-negative delta to a counter. Illegal on gauge families;
    /// a negative delta is rejected, never applied.
    pub fn add_counter(
        &mut self,
        desc: &MetricDesc,
        labels: &[(&str, &str)],
        delta: f64,
    ) -> Result<(), RegistryError> {
        self.require_kind(desc, MetricKind::Counter)?;
        if delta < 0.0 {
            return Err(RegistryError::NegativeDelta {
                name: desc.name.to_string(),
                delta,
            });
        }
        let id = self.touch_family(desc, labels)?;
        *self.inner.instruments.entry(id).or_insert(0.0) += delta;
        Ok(())
    }

    /// Sets a counter from a cumulative source total, clamped so the stored
    /// value never decreases. An apparent counter reset at the source keeps
    /// the prior value instead of going backwards.
    pub fn set_counter_total(
        &mut self,
        desc: &MetricDesc,
        labels: &[(&str, &str)],
        total: f64,
    ) -> Result<(), RegistryError> {
        self.require_kind(desc, MetricKind::Counter)?;
        let id = self.touch_family(desc, labels)?;
        let slot = self.inner.instruments.entry(id).or_insert(0.0);
        if total > *slot {
            *slot = total;
        }
        Ok(())
    }

    /// Removes every instrument whose family name starts with `prefix`.
    ///
    /// Used by samplers whose label sets are inherently dynamic per cycle
    /// (process table, mount table), so identities that disappeared do not
    /// linger in scrapes forever.
    pub fn reset_family(&mut self, prefix: &str) {
        self.inner
            .instruments
            .retain(|id, _| !id.name().starts_with(prefix));
    }

    fn require_kind(&self, desc: &MetricDesc, operation: MetricKind) -> Result<(), RegistryError> {
        if desc.kind != operation {
            return Err(RegistryError::KindMismatch {
                name: desc.name.to_string(),
                family: desc.kind,
                operation,
            });
        }
        Ok(())
    }

    fn touch_family(
        &mut self,
        desc: &MetricDesc,
        labels: &[(&str, &str)],
    ) -> Result<MetricId, RegistryError> {
        let id = MetricId::new(desc.name, labels)?;
        match self.inner.families.get(desc.name) {
            Some(meta) if meta.kind != desc.kind => Err(RegistryError::KindMismatch {
                name: desc.name.to_string(),
                family: meta.kind,
                operation: desc.kind,
            }),
            Some(_) => Ok(id),
            None => {
                self.inner.families.insert(
                    desc.name.to_string(),
                    FamilyMeta {
                        kind: desc.kind,
                        help: desc.help,
                    },
                );
                Ok(id)
            }
        }
    }
}
