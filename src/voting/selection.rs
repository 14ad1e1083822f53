use crate::catalog::Catalog;
use crate::error::BallotError;
use crate::models::{PendingVote, Selection};
use log::{debug, warn};
use std::collections::HashMap;
use std::sync::Arc;

/// Confirmed choices, one per position, plus at most one staged vote.
#[derive(Debug, Clone)]
pub struct SelectionStore {
    catalog: Arc<Catalog>,
    selections: HashMap<String, String>,
    pending: Option<PendingVote>,
}

impl SelectionStore {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            selections: HashMap::new(),
            pending: None,
        }
    }

    /// Stages a vote for confirmation, replacing whatever was staged before.
    pub fn stage(
        &mut self,
        position_id: &str,
        candidate_name: &str,
        position_title: &str,
    ) -> Result<&PendingVote, BallotError> {
        let position = self.catalog.position(position_id).ok_or_else(|| {
            warn!("Rejected vote for unknown position '{}'", position_id);
            BallotError::UnknownPosition(position_id.to_string())
        })?;
        if !position.has_candidate(candidate_name) {
            warn!("Rejected vote for '{}': not standing for '{}'", candidate_name, position_id);
            return Err(BallotError::UnknownCandidate {
                position: position_id.to_string(),
                candidate: candidate_name.to_string(),
            });
        }

        if let Some(previous) = &self.pending {
            debug!("Replacing staged vote for '{}' in '{}'", previous.candidate_name, previous.position_id);
        }
        Ok(self.pending.insert(PendingVote {
            position_id: position_id.to_string(),
            candidate_name: candidate_name.to_string(),
            position_title: position_title.to_string(),
        }))
    }

    /// Commits the staged vote, overwriting any earlier choice for its position.
    pub fn confirm(&mut self) -> Result<Selection, BallotError> {
        let pending = self.pending.take().ok_or(BallotError::NoPendingVote)?;
        self.selections
            .insert(pending.position_id.clone(), pending.candidate_name.clone());
        Ok(Selection {
            position_id: pending.position_id,
            candidate_name: pending.candidate_name,
        })
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn pending(&self) -> Option<&PendingVote> {
        self.pending.as_ref()
    }

    pub fn selection_for(&self, position_id: &str) -> Option<&str> {
        self.selections.get(position_id).map(String::as_str)
    }

    pub fn voted_count(&self) -> usize {
        self.selections.len()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Confirmed selections in ballot order.
    pub fn selections(&self) -> Vec<Selection> {
        self.catalog
            .positions()
            .iter()
            .filter_map(|position| {
                self.selections.get(&position.id).map(|candidate| Selection {
                    position_id: position.id.clone(),
                    candidate_name: candidate.clone(),
                })
            })
            .collect()
    }
}
