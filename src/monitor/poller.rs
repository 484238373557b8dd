//! The polling loop and monitor lifecycle.
//!
//! # Responsibilities
//! - Own the per-service state map for the lifetime of the loop
//! - Probe every configured service once per interval, in declared order
//! - Fold outcomes into the state machine and write metrics
//! - Dispatch alerts exactly at state transitions
//!
//! # Design Decisions
//! - One background task for the monitor's entire lifetime
//! - Checks within a tick run sequentially; a service's timeout bounds only
//!   its own probe
//! - The state map moves into the loop task; no other writer exists, so it
//!   needs no locking
//! - Shutdown is observed between ticks via an interruptible select, never
//!   mid-probe

use std::collections::HashMap;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::{self, MissedTickBehavior};

use crate::config::ServiceConfig;
use crate::monitor::probe::Prober;
use crate::monitor::state::{ServiceState, Transition};
use crate::notify::Notifier;
use crate::observability::metrics::MetricsRegistry;

/// Monitor lifecycle phase.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    NotStarted = 0,
    Running = 1,
    Stopped = 2,
}

impl From<u8> for LifecyclePhase {
    fn from(val: u8) -> Self {
        match val {
            1 => LifecyclePhase::Running,
            2 => LifecyclePhase::Stopped,
            _ => LifecyclePhase::NotStarted,
        }
    }
}

/// Health monitor instance.
///
/// Owns its metrics registry and service state; constructed once by the host
/// and shared by handle with the scrape and lifecycle entry points.
pub struct Monitor {
    services: Vec<ServiceConfig>,
    interval: Duration,
    registry: Arc<MetricsRegistry>,
    notifier: Option<Arc<dyn Notifier>>,
    prober: Prober,
    phase: AtomicU8,
    shutdown_tx: broadcast::Sender<()>,
}

impl Monitor {
    /// Create a monitor over the given services.
    ///
    /// Seeds the registry so every service scrapes as up with a fresh
    /// last-check timestamp before the first tick runs.
    pub fn new(
        services: Vec<ServiceConfig>,
        interval: Duration,
        registry: Arc<MetricsRegistry>,
        notifier: Option<Arc<dyn Notifier>>,
    ) -> Self {
        for svc in &services {
            registry.register_service(&svc.name);
        }

        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            services,
            interval,
            registry,
            notifier,
            prober: Prober::new(),
            phase: AtomicU8::new(LifecyclePhase::NotStarted as u8),
            shutdown_tx,
        }
    }

    /// Begin background execution.
    ///
    /// Spawns exactly one polling task. Any call after the first, including
    /// after `stop()`, is a logged no-op.
    pub fn start(self: &Arc<Self>) {
        if self
            .phase
            .compare_exchange(
                LifecyclePhase::NotStarted as u8,
                LifecyclePhase::Running as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_err()
        {
            tracing::warn!(phase = ?self.phase(), "Monitor start ignored");
            return;
        }

        tracing::info!(
            services = self.services.len(),
            interval_secs = self.interval.as_secs_f64(),
            "Health monitor starting"
        );

        let monitor = Arc::clone(self);
        let shutdown = self.shutdown_tx.subscribe();
        tokio::spawn(async move {
            monitor.run(shutdown).await;
        });
    }

    /// Request cooperative termination.
    ///
    /// Idempotent and callable from any task. The loop finishes any
    /// in-flight tick, then exits before the next interval wait begins.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Current lifecycle phase.
    ///
    /// Moves to `Stopped` only once the loop has actually exited, so
    /// `Running` is never reported false while a tick is still in flight.
    pub fn phase(&self) -> LifecyclePhase {
        self.phase.load(Ordering::Acquire).into()
    }

    /// Whether the polling loop is active.
    pub fn is_running(&self) -> bool {
        self.phase() == LifecyclePhase::Running
    }

    /// The metrics registry this monitor writes to.
    pub fn metrics(&self) -> &MetricsRegistry {
        &self.registry
    }

    async fn run(&self, mut shutdown: broadcast::Receiver<()>) {
        let mut states: HashMap<String, ServiceState> = self
            .services
            .iter()
            .map(|svc| (svc.name.clone(), ServiceState::new()))
            .collect();

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.recv() => {
                    tracing::info!("Health monitor received shutdown signal, exiting loop");
                    break;
                }
                _ = ticker.tick() => {
                    self.tick(&mut states).await;
                }
            }
        }

        self.phase
            .store(LifecyclePhase::Stopped as u8, Ordering::Release);
    }

    async fn tick(&self, states: &mut HashMap<String, ServiceState>) {
        for svc in &self.services {
            let Some(state) = states.get_mut(&svc.name) else {
                continue;
            };
            self.check_service(svc, state).await;
        }
    }

    async fn check_service(&self, svc: &ServiceConfig, state: &mut ServiceState) {
        let result = self.prober.probe(&svc.name, &svc.url, svc.timeout()).await;
        self.registry
            .observe_check_latency(&svc.name, result.latency);

        let transition = if result.healthy {
            state.record_success(svc.recovery_threshold)
        } else {
            // Every failed check counts, independent of alerting.
            self.registry.inc_failures(&svc.name);
            state.record_failure(svc.failure_threshold)
        };

        match transition {
            Transition::WentDown => {
                self.registry.set_service_up(&svc.name, false);
                tracing::error!(
                    service = %svc.name,
                    url = %svc.url,
                    consecutive_failures = state.consecutive_failures,
                    "Service transitioned to DOWN"
                );
                self.dispatch_alert(
                    format!("[DOWN] {} is UNHEALTHY", svc.name),
                    format!(
                        "Service {} appears DOWN.\nURL: {}\nConsecutive failures: {}",
                        svc.name, svc.url, state.consecutive_failures
                    ),
                );
            }
            Transition::Recovered => {
                self.registry.set_service_up(&svc.name, true);
                tracing::info!(
                    service = %svc.name,
                    url = %svc.url,
                    "Service recovered"
                );
                self.dispatch_alert(
                    format!("[RECOVERED] {} is UP", svc.name),
                    format!("Service {} recovered. URL: {}", svc.name, svc.url),
                );
            }
            Transition::None => {}
        }

        self.registry.set_last_check_now(&svc.name);
    }

    /// Hand an alert to the notifier without blocking the loop.
    ///
    /// Delivery failures are logged and never retried; the next state
    /// transition carries its own attempt.
    fn dispatch_alert(&self, subject: String, body: String) {
        let Some(notifier) = &self.notifier else {
            return;
        };
        let notifier = Arc::clone(notifier);
        tokio::spawn(async move {
            if let Err(e) = notifier.notify(&subject, &body).await {
                tracing::warn!(
                    channel = notifier.name(),
                    error = %e,
                    "Alert delivery failed"
                );
            }
        });
    }
}
