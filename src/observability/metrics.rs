//! Metrics collection and exposition.
//!
//! # Instruments
//! - `service_up` (gauge): 1 = up, 0 = down
//! - `service_last_check_timestamp_seconds` (gauge): epoch time of last check
//! - `service_failures_total` (counter): failed checks, never decremented
//! - `service_check_latency_seconds` (summary): check latency distribution
//!
//! All instruments are labeled by `service`.
//!
//! # Design Decisions
//! - The registry is an instance-owned Prometheus recorder, not the global
//!   default: constructed once, shared by handle, no hidden init order
//! - Updates go through `with_local_recorder`, reads through the exporter
//!   handle; both sides are atomic per instrument, so one writer task and
//!   any number of scrape readers never tear a sample

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use metrics::{
    counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Unit,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle, PrometheusRecorder};

pub const GAUGE_SERVICE_UP: &str = "service_up";
pub const GAUGE_LAST_CHECK: &str = "service_last_check_timestamp_seconds";
pub const COUNTER_FAILURES: &str = "service_failures_total";
pub const SUMMARY_CHECK_LATENCY: &str = "service_check_latency_seconds";

/// Concurrency-safe collection of the monitor's instruments.
pub struct MetricsRegistry {
    recorder: PrometheusRecorder,
    handle: PrometheusHandle,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            describe_gauge!(GAUGE_SERVICE_UP, "1 when the service is up, 0 when down");
            describe_gauge!(
                GAUGE_LAST_CHECK,
                Unit::Seconds,
                "Epoch timestamp of the most recent check"
            );
            describe_counter!(COUNTER_FAILURES, "Total failed checks per service");
            describe_histogram!(
                SUMMARY_CHECK_LATENCY,
                Unit::Seconds,
                "Wall-clock latency of health checks"
            );
        });

        Self { recorder, handle }
    }

    /// Seed the instruments for a newly configured service: up until proven
    /// otherwise, last checked now.
    pub fn register_service(&self, service: &str) {
        self.set_service_up(service, true);
        self.set_last_check_now(service);
    }

    pub fn set_service_up(&self, service: &str, up: bool) {
        let value = if up { 1.0 } else { 0.0 };
        metrics::with_local_recorder(&self.recorder, || {
            gauge!(GAUGE_SERVICE_UP, "service" => service.to_owned()).set(value);
        });
    }

    pub fn set_last_check_now(&self, service: &str) {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64();
        metrics::with_local_recorder(&self.recorder, || {
            gauge!(GAUGE_LAST_CHECK, "service" => service.to_owned()).set(now);
        });
    }

    pub fn inc_failures(&self, service: &str) {
        metrics::with_local_recorder(&self.recorder, || {
            counter!(COUNTER_FAILURES, "service" => service.to_owned()).increment(1);
        });
    }

    pub fn observe_check_latency(&self, service: &str, latency: Duration) {
        metrics::with_local_recorder(&self.recorder, || {
            histogram!(SUMMARY_CHECK_LATENCY, "service" => service.to_owned())
                .record(latency.as_secs_f64());
        });
    }

    /// Render the current snapshot in Prometheus text exposition format.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn registered_service_scrapes_as_up() {
        let registry = MetricsRegistry::new();
        registry.register_service("api");

        let text = registry.render();
        assert!(text.contains(r#"service_up{service="api"} 1"#));
        assert!(text.contains(r#"service_last_check_timestamp_seconds{service="api"}"#));
    }

    #[test]
    fn render_reflects_updates() {
        let registry = MetricsRegistry::new();
        registry.register_service("api");

        registry.set_service_up("api", false);
        assert!(registry
            .render()
            .contains(r#"service_up{service="api"} 0"#));

        registry.inc_failures("api");
        registry.inc_failures("api");
        assert!(registry
            .render()
            .contains(r#"service_failures_total{service="api"} 2"#));

        registry.observe_check_latency("api", Duration::from_millis(5));
        let text = registry.render();
        assert!(text.contains("service_check_latency_seconds"));
        assert!(text.contains(r#"service_check_latency_seconds_count{service="api"} 1"#));
    }

    #[test]
    fn labels_keep_services_independent() {
        let registry = MetricsRegistry::new();
        registry.register_service("api");
        registry.register_service("db");

        registry.set_service_up("db", false);

        let text = registry.render();
        assert!(text.contains(r#"service_up{service="api"} 1"#));
        assert!(text.contains(r#"service_up{service="db"} 0"#));
    }

    #[test]
    fn concurrent_writes_and_scrapes_do_not_tear() {
        let registry = Arc::new(MetricsRegistry::new());
        registry.register_service("api");

        let writer = {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || {
                for i in 0..1000u32 {
                    registry.set_service_up("api", i % 2 == 0);
                    registry.inc_failures("api");
                }
            })
        };

        for _ in 0..50 {
            let text = registry.render();
            assert!(text.contains("service_up"));
        }

        writer.join().unwrap();
        assert!(registry
            .render()
            .contains(r#"service_failures_total{service="api"} 1000"#));
    }
}
