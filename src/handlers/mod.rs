use crate::catalog::Catalog;
use crate::catalog::browser::CategoryBrowser;
use crate::commands::{Command, HELP};
use crate::error::BallotError;
use crate::models::LiveMode;
use crate::tally::TallyEngine;
use crate::tally::view::SectionView;
use crate::tasks::countdown::Countdown;
use crate::voting::VotingSession;
use chrono::Utc;
use log::{error, info, warn};
use std::fmt::Write as _;
use std::sync::Arc;

/// What the front end should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub quit: bool,
}

impl Reply {
    fn say(text: impl Into<String>) -> Self {
        Self { text: text.into(), quit: false }
    }
}

/// Everything the console front end drives: one voter's session, the live
/// results and the aspirant browser.
pub struct App {
    catalog: Arc<Catalog>,
    session: VotingSession,
    tally: TallyEngine,
    browser: CategoryBrowser,
    countdown: Countdown,
}

impl App {
    pub fn new(catalog: Arc<Catalog>, tally: TallyEngine, countdown: Countdown) -> Self {
        Self {
            session: VotingSession::new(Arc::clone(&catalog)),
            browser: CategoryBrowser::new(Arc::clone(&catalog)),
            catalog,
            tally,
            countdown,
        }
    }

    pub fn handle_line(&mut self, line: &str) -> Reply {
        match Command::parse(line) {
            Ok(command) => self.handle(command),
            Err(e) => {
                warn!("Could not parse input '{}': {}", line.trim(), e);
                Reply::say(e.to_string())
            }
        }
    }

    pub fn handle(&mut self, command: Command) -> Reply {
        info!("Received command: {:?}", command);
        match command {
            Command::Ballot => Reply::say(self.render_ballot()),
            Command::Vote { position_id, choice } => Reply::say(self.stage_vote(&position_id, choice)),
            Command::Confirm => Reply::say(self.confirm_vote()),
            Command::Cancel => {
                self.session.cancel();
                Reply::say("Vote cancelled.")
            }
            Command::Submit => Reply::say(self.submit()),
            Command::Progress => Reply::say(self.session.progress().to_string()),
            Command::Results { section } => Reply::say(self.render_results(section.as_deref())),
            Command::Live => {
                let mode = self.tally.toggle();
                let action = match mode {
                    LiveMode::Live => "Stop Live",
                    LiveMode::Stopped => "Start Live",
                };
                Reply::say(format!("{} (type 'live' to {})", mode.label(), action.to_lowercase()))
            }
            Command::Categories => Reply::say(self.render_categories()),
            Command::Category { id } => Reply::say(self.browse(&id)),
            Command::Aspirant { id } => Reply::say(match self.browser.details(id) {
                Ok(aspirant) => format!(
                    "{}\n  {}\n  Public key: {}\n  Image: {}",
                    aspirant.name, aspirant.party, aspirant.public_key, aspirant.image
                ),
                Err(e) => e.to_string(),
            }),
            Command::Countdown => {
                let now = Utc::now();
                if self.countdown.is_closed_at(now) {
                    Reply::say("Polls are closed.")
                } else {
                    Reply::say(format!("Polls close in {} (DD:HH:MM)", self.countdown.remaining_at(now)))
                }
            }
            Command::Help => Reply::say(HELP),
            Command::Quit => Reply { text: "Goodbye.".to_string(), quit: true },
        }
    }

    fn render_ballot(&self) -> String {
        let mut out = String::new();
        for line in self.session.ballot() {
            let _ = writeln!(out, "{} [{}]", line.title, line.position_id);
            for (index, candidate) in line.candidates.iter().enumerate() {
                let marker = if line.selected.as_deref() == Some(candidate.as_str()) {
                    "Selected"
                } else {
                    "Vote"
                };
                let _ = writeln!(out, "  {}. {:<28} {}", index + 1, candidate, marker);
            }
        }
        let _ = write!(out, "{}", self.session.progress());
        out
    }

    fn stage_vote(&mut self, position_id: &str, choice: usize) -> String {
        let Some(position) = self.catalog.position(position_id) else {
            return BallotError::UnknownPosition(position_id.to_string()).to_string();
        };
        let Some(candidate) = choice
            .checked_sub(1)
            .and_then(|index| position.candidate_names.get(index))
        else {
            return format!(
                "{} has {} candidates; pick a number from 1 to {}",
                position.title,
                position.candidate_names.len(),
                position.candidate_names.len()
            );
        };

        match self.session.stage(&position.id, candidate, &position.title) {
            Ok(pending) => format!(
                "Confirm your vote for {} as {}? (confirm / cancel)",
                pending.candidate_name, pending.position_title
            ),
            Err(e) => e.to_string(),
        }
    }

    fn confirm_vote(&mut self) -> String {
        let title = self.session.pending().map(|pending| pending.position_title.clone());
        match self.session.confirm() {
            Ok(selection) => format!(
                "Vote recorded: {} for {}. {}",
                selection.candidate_name,
                title.unwrap_or(selection.position_id),
                self.session.progress()
            ),
            // Confirming with nothing staged is harmless.
            Err(BallotError::NoPendingVote) => "Nothing to confirm.".to_string(),
            Err(e) => {
                error!("Unexpected confirmation failure: {}", e);
                e.to_string()
            }
        }
    }

    fn submit(&mut self) -> String {
        match self.session.submit() {
            Ok(receipt) => format!(
                "Voting complete! Your votes have been submitted.\nReceipt {} at {}",
                receipt.session_id,
                receipt.submitted_at.to_rfc3339()
            ),
            Err(BallotError::AlreadySubmitted) => "You have already submitted your ballot.".to_string(),
            Err(e) => e.to_string(),
        }
    }

    fn render_results(&self, section: Option<&str>) -> String {
        let views = match section {
            Some(key) => match self.tally.render_view(key) {
                Ok(view) => vec![view],
                Err(e) => return e.to_string(),
            },
            None => self.tally.render_all(),
        };

        let mut out = format!("== {} ==\n", self.tally.mode().label());
        for view in &views {
            render_section_text(&mut out, view);
        }
        out.trim_end().to_string()
    }

    fn render_categories(&self) -> String {
        let current = self.browser.current().map(|category| category.id.as_str());
        self.browser
            .categories()
            .iter()
            .map(|category| {
                let marker = if Some(category.id.as_str()) == current { "*" } else { " " };
                format!("{} {:<12} {}", marker, category.id, category.label)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn browse(&mut self, id: &str) -> String {
        match self.browser.select(id) {
            Ok(category) => {
                let mut out = format!("{}\n", category.label);
                for aspirant in &category.aspirants {
                    let _ = writeln!(out, "  [{}] {} - {}", aspirant.id, aspirant.name, aspirant.party);
                }
                out.trim_end().to_string()
            }
            Err(e) => e.to_string(),
        }
    }
}

fn render_section_text(out: &mut String, view: &SectionView) {
    let _ = writeln!(out, "{} ({} votes)", view.title, view.total_votes);
    for candidate in &view.candidates {
        let _ = writeln!(
            out,
            "  {}. {:<24} {:<26} {:>3}%  {} votes{}",
            candidate.rank + 1,
            candidate.name,
            candidate.party,
            candidate.percentage,
            candidate.votes,
            if candidate.leading { "  * Leading" } else { "" }
        );
    }
}
