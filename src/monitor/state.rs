//! Per-service health state machine.
//!
//! # States
//! - Up: service considered healthy
//! - Down: service considered unhealthy
//!
//! # State Transitions
//! ```text
//! Up → Down: consecutive failures >= failure_threshold
//! Down → Up: consecutive successes >= recovery_threshold
//! ```
//!
//! Hysteresis prevents flapping, and transitions are edge-triggered: the
//! caller is told about the tick where the flip happens and nothing after.
//! State is owned exclusively by the polling loop, so plain fields suffice.

/// Mutable per-service record tracked by the polling loop.
#[derive(Debug, Clone)]
pub struct ServiceState {
    /// Current health flag. Optimistic until first evidence.
    pub up: bool,
    /// Failure streak, reset by any success.
    pub consecutive_failures: u32,
    /// Success streak, reset by any failure.
    pub consecutive_successes: u32,
}

/// Outcome of folding one check result into the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// No state flip this tick.
    None,
    /// The service just crossed its failure threshold.
    WentDown,
    /// The service just crossed its recovery threshold.
    Recovered,
}

impl ServiceState {
    pub fn new() -> Self {
        Self {
            up: true,
            consecutive_failures: 0,
            consecutive_successes: 0,
        }
    }

    /// Fold a healthy check into the state.
    pub fn record_success(&mut self, recovery_threshold: u32) -> Transition {
        self.consecutive_failures = 0;
        self.consecutive_successes += 1;

        if !self.up && self.consecutive_successes >= recovery_threshold {
            self.up = true;
            return Transition::Recovered;
        }
        Transition::None
    }

    /// Fold an unhealthy check into the state.
    pub fn record_failure(&mut self, failure_threshold: u32) -> Transition {
        self.consecutive_successes = 0;
        self.consecutive_failures += 1;

        if self.up && self.consecutive_failures >= failure_threshold {
            self.up = false;
            return Transition::WentDown;
        }
        Transition::None
    }
}

impl Default for ServiceState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_up_with_zero_counters() {
        let state = ServiceState::new();
        assert!(state.up);
        assert_eq!(state.consecutive_failures, 0);
        assert_eq!(state.consecutive_successes, 0);
    }

    #[test]
    fn goes_down_exactly_at_failure_threshold() {
        let mut state = ServiceState::new();

        assert_eq!(state.record_failure(3), Transition::None);
        assert_eq!(state.record_failure(3), Transition::None);
        assert!(state.up, "still up after threshold - 1 failures");

        assert_eq!(state.record_failure(3), Transition::WentDown);
        assert!(!state.up);
    }

    #[test]
    fn no_repeated_down_transition_past_threshold() {
        let mut state = ServiceState::new();
        for _ in 0..3 {
            state.record_failure(3);
        }
        assert_eq!(state.record_failure(3), Transition::None);
        assert_eq!(state.record_failure(3), Transition::None);
        assert_eq!(state.consecutive_failures, 5);
    }

    #[test]
    fn threshold_of_one_trips_on_first_failure() {
        let mut state = ServiceState::new();
        assert_eq!(state.record_failure(1), Transition::WentDown);
    }

    #[test]
    fn success_resets_failure_streak_without_flipping() {
        let mut state = ServiceState::new();
        state.record_failure(3);
        state.record_failure(3);

        assert_eq!(state.record_success(1), Transition::None);
        assert!(state.up);
        assert_eq!(state.consecutive_failures, 0);
        assert_eq!(state.consecutive_successes, 1);
    }

    #[test]
    fn recovery_requires_consecutive_successes() {
        let mut state = ServiceState::new();
        for _ in 0..3 {
            state.record_failure(3);
        }
        assert!(!state.up);

        assert_eq!(state.record_success(2), Transition::None);
        assert!(!state.up, "one success below recovery threshold of 2");

        // A failure in between resets the success streak.
        state.record_failure(3);
        assert_eq!(state.consecutive_successes, 0);

        assert_eq!(state.record_success(2), Transition::None);
        assert_eq!(state.record_success(2), Transition::Recovered);
        assert!(state.up);
    }

    #[test]
    fn recovery_is_edge_triggered() {
        let mut state = ServiceState::new();
        for _ in 0..3 {
            state.record_failure(3);
        }
        assert_eq!(state.record_success(1), Transition::Recovered);
        assert_eq!(state.record_success(1), Transition::None);
        assert_eq!(state.record_success(1), Transition::None);
    }
}
