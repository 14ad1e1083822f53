use super::selection::SelectionStore;
use serde::Serialize;
use std::fmt;

/// How far through the ballot the voter is. Always derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub voted_count: usize,
    pub total_count: usize,
}

impl Progress {
    pub fn of(store: &SelectionStore) -> Self {
        Self {
            voted_count: store.voted_count(),
            total_count: store.catalog().positions().len(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.total_count > 0 && self.voted_count == self.total_count
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {} positions voted", self.voted_count, self.total_count)
    }
}
