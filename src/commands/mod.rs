use thiserror::Error;

/// Everything the console front end lets a voter do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ballot,
    /// Stage a vote: position id and 1-based candidate number on the ballot.
    Vote { position_id: String, choice: usize },
    Confirm,
    Cancel,
    Submit,
    Progress,
    Results { section: Option<String> },
    Live,
    Categories,
    Category { id: String },
    Aspirant { id: u32 },
    Countdown,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
}

pub const HELP: &str = "\
Commands:
  ballot                      show positions and your current choices
  vote <position> <number>    pick a candidate (asks for confirmation)
  confirm | cancel            answer the confirmation prompt
  progress                    how many positions you have voted
  submit                      submit your ballot
  results [section]           live results, all sections or one
  live                        start/stop live result updates
  categories                  list aspirant categories
  category <id>               browse aspirants in a category
  aspirant <id>               aspirant details
  countdown                   time until polls close
  help | quit";

impl Command {
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or(ParseError::Empty)?.to_ascii_lowercase();
        let args: Vec<&str> = words.collect();

        let command = match (name.as_str(), args.as_slice()) {
            ("ballot" | "positions", []) => Command::Ballot,
            ("vote", [position_id, choice]) => Command::Vote {
                position_id: position_id.to_string(),
                choice: choice
                    .parse::<usize>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or(ParseError::Usage("vote <position> <number>"))?,
            },
            ("vote", _) => return Err(ParseError::Usage("vote <position> <number>")),
            ("confirm" | "yes", []) => Command::Confirm,
            ("cancel" | "back", []) => Command::Cancel,
            ("submit", []) => Command::Submit,
            ("progress", []) => Command::Progress,
            ("results", []) => Command::Results { section: None },
            ("results", [section]) => Command::Results { section: Some(section.to_string()) },
            ("live", []) => Command::Live,
            ("categories", []) => Command::Categories,
            ("category", [id]) => Command::Category { id: id.to_string() },
            ("category", _) => return Err(ParseError::Usage("category <id>")),
            ("aspirant", [id]) => Command::Aspirant {
                id: id.parse::<u32>().map_err(|_| ParseError::Usage("aspirant <id>"))?,
            },
            ("aspirant", _) => return Err(ParseError::Usage("aspirant <id>")),
            ("countdown", []) => Command::Countdown,
            ("help" | "?", _) => Command::Help,
            ("quit" | "exit", []) => Command::Quit,
            _ => return Err(ParseError::Unknown(line.trim().to_string())),
        };
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_vote_with_candidate_number() {
        assert_eq!(
            Command::parse("vote examOfficer 2").unwrap(),
            Command::Vote { position_id: "examOfficer".into(), choice: 2 }
        );
        assert_eq!(Command::parse("  VOTE hod 1 ").unwrap(), Command::Vote { position_id: "hod".into(), choice: 1 });
    }

    #[test]
    fn rejects_bad_vote_arguments() {
        for line in ["vote", "vote hod", "vote hod zero", "vote hod 0", "vote hod 1 2"] {
            assert_eq!(Command::parse(line).unwrap_err(), ParseError::Usage("vote <position> <number>"));
        }
    }

    #[test]
    fn parses_optional_results_section() {
        assert_eq!(Command::parse("results").unwrap(), Command::Results { section: None });
        assert_eq!(
            Command::parse("results secretary1").unwrap(),
            Command::Results { section: Some("secretary1".into()) }
        );
    }

    #[test]
    fn parses_browse_commands() {
        assert_eq!(Command::parse("category secretary").unwrap(), Command::Category { id: "secretary".into() });
        assert_eq!(Command::parse("aspirant 4").unwrap(), Command::Aspirant { id: 4 });
        assert!(matches!(Command::parse("aspirant four"), Err(ParseError::Usage(_))));
    }

    #[test]
    fn reports_empty_and_unknown_input() {
        assert_eq!(Command::parse("   ").unwrap_err(), ParseError::Empty);
        assert_eq!(Command::parse("recount now").unwrap_err(), ParseError::Unknown("recount now".into()));
    }
}
