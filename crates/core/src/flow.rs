//! Submission state machine.
//!
//! ```text
//! Idle -> Validating -> Rejected
//!                    -> DuplicateCheck -> AllDuplicate
//!                                      -> Persisting -> PersistError
//!                                                    -> Success
//! ```
//!
//! A store failure while reading (catalog load, existence query) also ends in
//! `PersistError`. Terminal states are never left; a new submission starts a
//! new flow.

use tracing::debug;

use crate::errors::{DeskError, DeskResult};
use crate::models::assignment::SubmissionState;

use SubmissionState::*;

const TRANSITIONS: &[(SubmissionState, SubmissionState)] = &[
    (Idle, Validating),
    (Validating, Rejected),
    (Validating, DuplicateCheck),
    (Validating, PersistError),
    (DuplicateCheck, AllDuplicate),
    (DuplicateCheck, Persisting),
    (DuplicateCheck, PersistError),
    (Persisting, PersistError),
    (Persisting, Success),
];

pub fn can_transition(from: SubmissionState, to: SubmissionState) -> bool {
    TRANSITIONS.contains(&(from, to))
}

#[derive(Debug, Clone)]
pub struct SubmissionFlow {
    state: SubmissionState,
    trail: Vec<SubmissionState>,
}

impl Default for SubmissionFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionFlow {
    pub fn new() -> Self {
        Self {
            state: Idle,
            trail: vec![Idle],
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// Every state visited so far, starting with `Idle`.
    pub fn trail(&self) -> &[SubmissionState] {
        &self.trail
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn advance(&mut self, to: SubmissionState) -> DeskResult<SubmissionState> {
        if !can_transition(self.state, to) {
            return Err(DeskError::Internal(format!(
                "Invalid submission transition {:?} -> {:?}",
                self.state, to
            )));
        }
        debug!("Submission state {:?} -> {:?}", self.state, to);
        self.state = to;
        self.trail.push(to);
        Ok(to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn happy_path_reaches_success() {
        let mut flow = SubmissionFlow::new();
        for next in [Validating, DuplicateCheck, Persisting, Success] {
            flow.advance(next).unwrap();
        }

        assert!(flow.is_finished());
        assert_eq!(flow.trail(), &[Idle, Validating, DuplicateCheck, Persisting, Success]);
    }

    #[rstest]
    #[case(Idle, Persisting)]
    #[case(Idle, Success)]
    #[case(Validating, Success)]
    #[case(DuplicateCheck, Rejected)]
    #[case(Rejected, Validating)]
    #[case(Success, Idle)]
    #[case(AllDuplicate, Persisting)]
    fn illegal_transitions_are_refused(#[case] from: SubmissionState, #[case] to: SubmissionState) {
        assert!(!can_transition(from, to));
    }

    #[test]
    fn terminal_states_have_no_exit() {
        for terminal in [Rejected, AllDuplicate, PersistError, Success] {
            assert!(terminal.is_terminal());
            assert!(TRANSITIONS.iter().all(|(from, _)| *from != terminal));
        }
    }

    #[test]
    fn refused_transition_leaves_state_untouched() {
        let mut flow = SubmissionFlow::new();
        flow.advance(Validating).unwrap();

        let err = flow.advance(Success).unwrap_err();

        assert!(err.to_string().contains("Invalid submission transition"));
        assert_eq!(flow.state(), Validating);
    }
}
