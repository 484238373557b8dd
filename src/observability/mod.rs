//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Polling loop produces:
//!     → logging.rs (structured log events)
//!     → metrics.rs (gauges, counter, latency summary)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Metrics are cheap (atomic updates inside the exporter)
//! - The registry is owned by the monitor instance, not process-global

pub mod logging;
pub mod metrics;

pub use self::metrics::MetricsRegistry;
