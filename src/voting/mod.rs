pub mod progress;
pub mod selection;
pub mod submission;

use crate::catalog::Catalog;
use crate::error::BallotError;
use crate::models::{PendingVote, Receipt, Selection, SessionState};
use chrono::Utc;
use log::info;
use progress::Progress;
use selection::SelectionStore;
use serde::Serialize;
use std::sync::Arc;
use submission::SubmissionGate;
use uuid::Uuid;

/// One row of the ballot page: a position, its candidates and the current choice.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BallotLine {
    pub position_id: String,
    pub title: String,
    pub candidates: Vec<String>,
    pub selected: Option<String>,
}

/// A single voter's pass through the ballot.
#[derive(Debug)]
pub struct VotingSession {
    id: Uuid,
    store: SelectionStore,
    gate: SubmissionGate,
    receipt: Option<Receipt>,
}

impl VotingSession {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let id = Uuid::new_v4();
        info!("Opened voting session {}", id);
        Self {
            id,
            store: SelectionStore::new(catalog),
            gate: SubmissionGate::default(),
            receipt: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// A submitted ballot is sealed: nothing more can be staged.
    pub fn stage(
        &mut self,
        position_id: &str,
        candidate_name: &str,
        position_title: &str,
    ) -> Result<&PendingVote, BallotError> {
        if self.gate.state() == SessionState::Submitted {
            return Err(BallotError::AlreadySubmitted);
        }
        self.store.stage(position_id, candidate_name, position_title)
    }

    pub fn confirm(&mut self) -> Result<Selection, BallotError> {
        if self.gate.state() == SessionState::Submitted {
            self.store.cancel();
            return Err(BallotError::AlreadySubmitted);
        }
        self.store.confirm()
    }

    pub fn cancel(&mut self) {
        self.store.cancel();
    }

    pub fn pending(&self) -> Option<&PendingVote> {
        self.store.pending()
    }

    pub fn selection_for(&self, position_id: &str) -> Option<&str> {
        self.store.selection_for(position_id)
    }

    pub fn progress(&self) -> Progress {
        Progress::of(&self.store)
    }

    pub fn can_submit(&self) -> bool {
        self.gate.can_submit(self.progress())
    }

    pub fn state(&self) -> SessionState {
        self.gate.state()
    }

    pub fn submit(&mut self) -> Result<&Receipt, BallotError> {
        let progress = self.progress();
        self.gate.submit(progress)?;
        Ok(self.receipt.insert(Receipt {
            session_id: self.id,
            submitted_at: Utc::now(),
            selections: self.store.selections(),
        }))
    }

    pub fn receipt(&self) -> Option<&Receipt> {
        self.receipt.as_ref()
    }

    pub fn ballot(&self) -> Vec<BallotLine> {
        self.store
            .catalog()
            .positions()
            .iter()
            .map(|position| BallotLine {
                position_id: position.id.clone(),
                title: position.title.clone(),
                candidates: position.candidate_names.clone(),
                selected: self.store.selection_for(&position.id).map(str::to_string),
            })
            .collect()
    }
}
