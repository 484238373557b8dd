//! Health monitoring subsystem.
//!
//! # Data Flow
//! ```text
//! Polling loop (poller.rs):
//!     Interval ticker
//!     → Probe each service (probe.rs)
//!     → Fold outcome into state machine (state.rs)
//!     → Write metrics, dispatch alerts on transitions
//! ```
//!
//! # Design Decisions
//! - State transitions require consecutive successes/failures (hysteresis)
//! - Alerts are edge-triggered: one per flip, never per qualifying tick
//! - Health state is owned by the loop; metrics are the shared surface

pub mod poller;
pub mod probe;
pub mod state;

pub use poller::{LifecyclePhase, Monitor};
pub use probe::{ProbeResult, Prober};
pub use state::{ServiceState, Transition};
