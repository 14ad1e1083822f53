use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An electable office with a fixed candidate list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: String,
    pub title: String,
    #[serde(rename = "candidates")]
    pub candidate_names: Vec<String>,
}

impl Position {
    pub fn new(id: &str, title: &str, candidate_names: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            candidate_names: candidate_names.iter().map(|name| name.to_string()).collect(),
        }
    }

    pub fn has_candidate(&self, name: &str) -> bool {
        self.candidate_names.iter().any(|candidate| candidate == name)
    }
}

/// A confirmed vote for one candidate in one position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub position_id: String,
    pub candidate_name: String,
}

/// A staged vote waiting for the voter to confirm or back out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingVote {
    pub position_id: String,
    pub candidate_name: String,
    pub position_title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Voting,
    Submitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiveMode {
    Live,
    Stopped,
}

impl LiveMode {
    pub fn flipped(self) -> Self {
        match self {
            LiveMode::Live => LiveMode::Stopped,
            LiveMode::Stopped => LiveMode::Live,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LiveMode::Live => "LIVE RESULTS",
            LiveMode::Stopped => "FINAL RESULTS",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: u32,
    pub name: String,
    #[serde(default = "independent")]
    pub party: String,
    #[serde(default, rename = "image")]
    pub image_ref: Option<String>,
    pub votes: u64,
}

fn independent() -> String {
    "Independent".to_string()
}

/// One block of the results page: a position and its running counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsSection {
    pub key: String,
    pub title: String,
    /// Externally reported total. Only trusted until the first live tick.
    #[serde(default, rename = "totalVotes")]
    pub reported_total: Option<u64>,
    pub candidates: Vec<Candidate>,
}

impl ResultsSection {
    /// Saturates at `u64::MAX` rather than wrapping.
    pub fn candidate_sum(&self) -> u64 {
        self.candidates
            .iter()
            .fold(0u64, |sum, candidate| sum.saturating_add(candidate.votes))
    }

    /// A reported total of zero falls back to the candidate sum.
    pub fn total_votes(&self) -> u64 {
        match self.reported_total {
            Some(total) if total > 0 => total,
            _ => self.candidate_sum(),
        }
    }
}

/// An aspirant shown in the category browser and its detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aspirant {
    pub id: u32,
    pub name: String,
    pub party: String,
    pub image: String,
    pub public_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub label: String,
    pub aspirants: Vec<Aspirant>,
}

/// Proof of a submitted ballot handed back to the voter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub session_id: Uuid,
    pub submitted_at: DateTime<Utc>,
    pub selections: Vec<Selection>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(reported_total: Option<u64>) -> ResultsSection {
        ResultsSection {
            key: "hod".to_string(),
            title: "HOD ASPIRANTS".to_string(),
            reported_total,
            candidates: vec![
                Candidate { id: 1, name: "A".into(), party: "P".into(), image_ref: None, votes: 40 },
                Candidate { id: 2, name: "B".into(), party: "Q".into(), image_ref: None, votes: 2 },
            ],
        }
    }

    #[test]
    fn reported_total_wins_until_cleared() {
        assert_eq!(section(Some(1000)).total_votes(), 1000);
        assert_eq!(section(None).total_votes(), 42);
        assert_eq!(section(Some(0)).total_votes(), 42);
    }

    #[test]
    fn huge_starting_counts_saturate_the_total() {
        let mut section = section(None);
        section.candidates[0].votes = u64::MAX;
        section.candidates[1].votes = 1;
        assert_eq!(section.total_votes(), u64::MAX);
    }

    #[test]
    fn results_json_uses_front_end_field_names() {
        let json = r#"{
            "key": "hod",
            "title": "HOD ASPIRANTS",
            "totalVotes": 1000,
            "candidates": [{ "id": 1, "name": "A", "votes": 550, "image": "/images/a.jpg" }]
        }"#;
        let parsed: ResultsSection = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.reported_total, Some(1000));
        assert_eq!(parsed.candidates[0].party, "Independent");
        assert_eq!(parsed.candidates[0].image_ref.as_deref(), Some("/images/a.jpg"));
    }

    #[test]
    fn live_mode_flips() {
        assert_eq!(LiveMode::Live.flipped(), LiveMode::Stopped);
        assert_eq!(LiveMode::Stopped.flipped().flipped(), LiveMode::Stopped);
    }
}
