use thiserror::Error;

/// Rejections raised while a voter fills in and submits a ballot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BallotError {
    #[error("unknown position '{0}'")]
    UnknownPosition(String),
    #[error("'{candidate}' is not standing for '{position}'")]
    UnknownCandidate { position: String, candidate: String },
    #[error("Please vote for all positions before submitting. ({voted} of {total} positions voted)")]
    IncompleteBallot { voted: usize, total: usize },
    #[error("this ballot has already been submitted")]
    AlreadySubmitted,
    #[error("no vote is waiting for confirmation")]
    NoPendingVote,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TallyError {
    #[error("unknown results section '{0}'")]
    UnknownSection(String),
    #[error("vote count for candidate {candidate_id} in '{section}' would overflow")]
    CountOverflow { section: String, candidate_id: u32 },
    #[error("increment source panicked during a tick")]
    SourcePanicked,
    #[error("live tally needs a running tokio runtime")]
    NoRuntime,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("unknown category '{0}'")]
    UnknownCategory(String),
    #[error("no aspirant with id {0} in the current category")]
    UnknownAspirant(u32),
    #[error("position '{0}' is declared more than once")]
    DuplicatePosition(String),
    #[error("position '{0}' has no candidates")]
    EmptyPosition(String),
    #[error("candidate '{candidate}' appears twice under '{position}'")]
    DuplicateCandidate { position: String, candidate: String },
    #[error("results section '{0}' is declared more than once")]
    DuplicateSection(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalog file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("invalid value '{value}' for {name}")]
    InvalidVar { name: &'static str, value: String },
}
