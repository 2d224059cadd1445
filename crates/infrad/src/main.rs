//! infrad — host telemetry agent.
//!
//! Samples OS resource counters on independent per-family cadences and
//! exposes them as Prometheus metrics on `GET /metrics`.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::net::SocketAddr;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use clap::Parser;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

#[cfg(not(target_os = "linux"))]
use infrad_core::collector::MockFs;
#[cfg(target_os = "linux")]
use infrad_core::collector::RealFs;
use infrad_core::collector::{ProcStats, SystemStats};
use infrad_core::metrics::{CONTENT_TYPE, MetricRegistry, render_text};
use infrad_core::sampler::{
    CpuSampler, DiskIoSampler, FilesystemSampler, MemorySampler, NetworkSampler,
    ProcessListSampler,
};
use infrad_core::scheduler::{Scheduler, TaskConfig};

// ============================================================
// CLI
// ============================================================

/// Host telemetry agent.
#[derive(Parser)]
#[command(name = "infrad", about = "Host telemetry agent", version = infrad_core::VERSION)]
struct Args {
    /// Listen address for the metrics endpoint.
    #[arg(long, default_value = "0.0.0.0:8083", env = "INFRAD_LISTEN")]
    listen: String,

    /// Path to /proc filesystem (for testing/mocking).
    #[arg(long, default_value = "/proc")]
    proc_path: String,

    /// Sampling interval in seconds for CPU, disk I/O, and network I/O.
    #[arg(long, default_value = "1", env = "INFRAD_INTERVAL")]
    interval: u64,

    /// Memory sampling interval in seconds.
    #[arg(long, default_value = "5", env = "INFRAD_MEMORY_INTERVAL")]
    memory_interval: u64,

    /// Filesystem capacity sampling interval in seconds.
    #[arg(long, default_value = "30", env = "INFRAD_FS_INTERVAL")]
    fs_interval: u64,

    /// Process list sampling interval in seconds.
    #[arg(long, default_value = "10", env = "INFRAD_PROCESS_INTERVAL")]
    process_interval: u64,

    /// Increase logging verbosity (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

/// Initializes the tracing subscriber with the appropriate log level.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::from_default_env()
        .add_directive(format!("infrad={}", level).parse().unwrap())
        .add_directive(format!("infrad_core={}", level).parse().unwrap());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

// ============================================================
// Main
// ============================================================

fn main() {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
        .block_on(async_main(args));
}

async fn async_main(args: Args) {
    info!(version = infrad_core::VERSION, "starting");

    let registry = Arc::new(MetricRegistry::new());
    let stats = create_stats(&args);

    let mut scheduler = Scheduler::new(Arc::clone(&registry));
    let fast = TaskConfig::new(Duration::from_secs(args.interval.max(1)));
    scheduler.spawn(Box::new(CpuSampler::new(Arc::clone(&stats))), fast);
    scheduler.spawn(Box::new(DiskIoSampler::new(Arc::clone(&stats))), fast);
    scheduler.spawn(Box::new(NetworkSampler::new(Arc::clone(&stats))), fast);
    scheduler.spawn(
        Box::new(MemorySampler::new(Arc::clone(&stats))),
        TaskConfig::new(Duration::from_secs(args.memory_interval.max(1))),
    );
    scheduler.spawn(
        Box::new(FilesystemSampler::new(Arc::clone(&stats))),
        TaskConfig::new(Duration::from_secs(args.fs_interval.max(1))),
    );
    scheduler.spawn(
        Box::new(ProcessListSampler::new(Arc::clone(&stats))),
        TaskConfig::new(Duration::from_secs(args.process_interval.max(1))),
    );

    let app = router(Arc::clone(&registry));

    let addr: SocketAddr = match args.listen.parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!(listen = %args.listen, error = %e, "invalid listen address");
            process::exit(1);
        }
    };

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%addr, error = %e, "failed to bind metrics listener");
            process::exit(1);
        }
    };
    info!(%addr, "listening");

    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());
    if let Err(e) = server.await {
        error!(error = %e, "server error");
        process::exit(1);
    }

    scheduler.shutdown().await;
    info!("stopped");
}

fn create_stats(args: &Args) -> Arc<dyn SystemStats> {
    #[cfg(target_os = "linux")]
    {
        Arc::new(ProcStats::new(RealFs::new(), &args.proc_path))
    }
    #[cfg(not(target_os = "linux"))]
    {
        Arc::new(ProcStats::new(MockFs::typical_system(), &args.proc_path))
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("received shutdown signal"),
        Err(e) => {
            error!(error = %e, "failed to install shutdown handler");
            std::future::pending::<()>().await;
        }
    }
}

// ============================================================
// HTTP
// ============================================================

fn router(registry: Arc<MetricRegistry>) -> Router {
    Router::new()
        .route("/metrics", get(handle_metrics))
        .route("/health", get(handle_health))
        .with_state(registry)
}

/// Serves the current snapshot. Read-only: scrapes never mutate registry
/// state, and per-family failures never surface here.
async fn handle_metrics(State(registry): State<Arc<MetricRegistry>>) -> impl IntoResponse {
    let body = render_text(&registry.snapshot());
    ([(header::CONTENT_TYPE, CONTENT_TYPE)], body)
}

async fn handle_health() -> &'static str {
    "ok"
}
