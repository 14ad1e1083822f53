use crate::models::ResultsSection;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateView {
    pub id: u32,
    pub name: String,
    pub party: String,
    pub image_ref: Option<String>,
    pub votes: u64,
    pub percentage: u32,
    pub rank: usize,
    pub leading: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionView {
    pub key: String,
    pub title: String,
    pub total_votes: u64,
    pub candidates: Vec<CandidateView>,
}

/// Whole-number share of the section total, rounded half up.
/// Shares are rounded independently and need not add up to 100.
pub fn percentage(votes: u64, total_votes: u64) -> u32 {
    if total_votes == 0 {
        return 0;
    }
    (votes as f64 / total_votes as f64 * 100.0).round() as u32
}

/// Ranks a section for display. Ties keep their declared order.
pub fn render_section(section: &ResultsSection) -> SectionView {
    let total_votes = section.total_votes();

    let mut ranked: Vec<_> = section.candidates.iter().collect();
    // sort_by is stable
    ranked.sort_by(|a, b| b.votes.cmp(&a.votes));

    let candidates = ranked
        .into_iter()
        .enumerate()
        .map(|(rank, candidate)| CandidateView {
            id: candidate.id,
            name: candidate.name.clone(),
            party: candidate.party.clone(),
            image_ref: candidate.image_ref.clone(),
            votes: candidate.votes,
            percentage: percentage(candidate.votes, total_votes),
            rank,
            leading: rank == 0,
        })
        .collect();

    SectionView {
        key: section.key.clone(),
        title: section.title.clone(),
        total_votes,
        candidates,
    }
}
