use super::progress::Progress;
use crate::error::BallotError;
use crate::models::SessionState;
use log::{info, warn};

/// Guards the one-way `Voting -> Submitted` transition.
#[derive(Debug, Clone)]
pub struct SubmissionGate {
    state: SessionState,
}

impl Default for SubmissionGate {
    fn default() -> Self {
        Self { state: SessionState::Voting }
    }
}

impl SubmissionGate {
    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn can_submit(&self, progress: Progress) -> bool {
        progress.is_complete()
    }

    pub fn submit(&mut self, progress: Progress) -> Result<(), BallotError> {
        if self.state == SessionState::Submitted {
            warn!("Ignoring repeated submission");
            return Err(BallotError::AlreadySubmitted);
        }
        if !self.can_submit(progress) {
            warn!("Refusing incomplete ballot ({})", progress);
            return Err(BallotError::IncompleteBallot {
                voted: progress.voted_count,
                total: progress.total_count,
            });
        }
        self.state = SessionState::Submitted;
        info!("Ballot submitted ({})", progress);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    fn progress(voted_count: usize, total_count: usize) -> Progress {
        Progress { voted_count, total_count }
    }

    #[test]
    fn incomplete_ballot_stays_voting() {
        let mut gate = SubmissionGate::default();
        assert!(!gate.can_submit(progress(3, 4)));
        assert_eq!(
            gate.submit(progress(3, 4)).unwrap_err(),
            BallotError::IncompleteBallot { voted: 3, total: 4 }
        );
        assert_eq!(gate.state(), SessionState::Voting);
    }

    #[test]
    fn complete_ballot_submits_once() {
        let mut gate = SubmissionGate::default();
        assert_ok!(gate.submit(progress(4, 4)));
        assert_eq!(gate.state(), SessionState::Submitted);
        assert_eq!(gate.submit(progress(4, 4)).unwrap_err(), BallotError::AlreadySubmitted);
        assert_eq!(gate.state(), SessionState::Submitted);
    }

    #[test]
    fn zero_positions_cannot_submit() {
        let mut gate = SubmissionGate::default();
        assert_err!(gate.submit(progress(0, 0)));
    }
}
