//! Per-stage retry state machine
//!
//! `Pending → CallingModel → Validating → {Done | Retry | Failed}`. The
//! transitions are pure functions so the retry policy is unit-testable
//! without touching the network.

/// State of one stage within a single document's pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageState {
    /// Not started yet.
    Pending,
    /// A model call for the given attempt is in flight.
    CallingModel {
        /// 1-based attempt number.
        attempt: u32,
    },
    /// Model output for the given attempt is being parsed and validated.
    Validating {
        /// 1-based attempt number.
        attempt: u32,
    },
    /// The attempt failed and budget remains; feedback goes into the next
    /// attempt's instructions.
    Retry {
        /// Attempt that failed.
        attempt: u32,
        /// Failure text to carry into the next attempt.
        feedback: String,
    },
    /// The stage produced a validated entity.
    Done {
        /// Attempts used.
        attempts: u32,
    },
    /// Retry budget exhausted; terminal.
    Failed {
        /// Attempts used.
        attempts: u32,
        /// Last recorded failure reason.
        reason: String,
    },
}

impl StageState {
    /// Whether no further attempts will be made.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StageState::Done { .. } | StageState::Failed { .. })
    }
}

/// Attempt number and carried feedback for the next model call, or `None`
/// when the state admits no further attempt.
pub fn next_attempt(state: &StageState) -> Option<(u32, Option<String>)> {
    match state {
        StageState::Pending => Some((1, None)),
        StageState::Retry { attempt, feedback } => Some((attempt + 1, Some(feedback.clone()))),
        _ => None,
    }
}

/// State after a failed attempt: retry while budget remains, terminal
/// failure otherwise.
pub fn after_failure(attempt: u32, max_retries: u32, reason: String) -> StageState {
    if attempt < max_retries {
        StageState::Retry {
            attempt,
            feedback: reason,
        }
    } else {
        StageState::Failed {
            attempts: attempt,
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_starts_at_attempt_one() {
        assert_eq!(next_attempt(&StageState::Pending), Some((1, None)));
    }

    #[test]
    fn test_retry_carries_feedback_forward() {
        let state = StageState::Retry {
            attempt: 1,
            feedback: "bad citation".into(),
        };
        assert_eq!(
            next_attempt(&state),
            Some((2, Some("bad citation".into())))
        );
    }

    #[test]
    fn test_terminal_states_admit_no_attempt() {
        assert_eq!(next_attempt(&StageState::Done { attempts: 1 }), None);
        assert_eq!(
            next_attempt(&StageState::Failed {
                attempts: 3,
                reason: "gone".into()
            }),
            None
        );
        assert_eq!(next_attempt(&StageState::CallingModel { attempt: 1 }), None);
        assert_eq!(next_attempt(&StageState::Validating { attempt: 1 }), None);
    }

    #[test]
    fn test_failure_within_budget_retries() {
        let state = after_failure(1, 3, "reason".into());
        assert_eq!(
            state,
            StageState::Retry {
                attempt: 1,
                feedback: "reason".into()
            }
        );
        assert!(!state.is_terminal());
    }

    #[test]
    fn test_failure_at_budget_is_terminal() {
        let state = after_failure(3, 3, "last straw".into());
        assert_eq!(
            state,
            StageState::Failed {
                attempts: 3,
                reason: "last straw".into()
            }
        );
        assert!(state.is_terminal());
    }

    #[test]
    fn test_full_failing_walk_makes_exactly_max_attempts() {
        let max_retries = 3;
        let mut state = StageState::Pending;
        let mut calls = 0;
        while let Some((attempt, _feedback)) = next_attempt(&state) {
            calls += 1;
            state = after_failure(attempt, max_retries, format!("attempt {attempt} failed"));
        }
        assert_eq!(calls, 3);
        assert!(matches!(state, StageState::Failed { attempts: 3, .. }));
    }
}
