//! Service health monitoring daemon.
//!
//! Probes a configured list of services at a fixed interval, tracks a
//! threshold-gated up/down state machine per service, exposes Prometheus
//! metrics for scraping, and emails alerts exactly at state transitions.

pub mod config;
pub mod http;
pub mod monitor;
pub mod notify;
pub mod observability;

pub use config::MonitorConfig;
pub use http::HttpServer;
pub use monitor::Monitor;
pub use observability::MetricsRegistry;
