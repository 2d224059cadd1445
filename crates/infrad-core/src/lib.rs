//! infrad-core — shared library for the infrad host telemetry agent.
//!
//! Provides:
//! - `collector` — OS counter acquisition from the Linux `/proc` filesystem
//! - `metrics` — metric registry and Prometheus text exposition
//! - `sampler` — periodic per-family sampler jobs
//! - `scheduler` — supervised execution of sampler tasks

pub mod collector;
pub mod metrics;
pub mod sampler;
pub mod scheduler;

/// Crate version, shared by the CLI `--version` output.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
