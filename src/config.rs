use crate::catalog::Catalog;
use crate::catalog::sample::sample_catalog;
use crate::error::ConfigError;
use crate::tasks::countdown::Countdown;
use log::info;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_TALLY_INTERVAL_MS: u64 = 5000;
// 2 days, 12 hours, 45 minutes
const DEFAULT_CLOSES_IN_MINUTES: i64 = 3645;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub catalog_path: Option<PathBuf>,
    pub tally_interval: Duration,
    pub closes_in_minutes: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: None,
            tally_interval: Duration::from_millis(DEFAULT_TALLY_INTERVAL_MS),
            closes_in_minutes: DEFAULT_CLOSES_IN_MINUTES,
        }
    }
}

impl Config {
    /// Reads settings from the process environment (and `.env`, if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(path) = lookup("BALLOT_CATALOG_PATH").filter(|p| !p.trim().is_empty()) {
            config.catalog_path = Some(PathBuf::from(path));
        }

        if let Some(value) = lookup("TALLY_INTERVAL_MS") {
            let millis: u64 = value
                .trim()
                .parse()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or(ConfigError::InvalidVar { name: "TALLY_INTERVAL_MS", value })?;
            config.tally_interval = Duration::from_millis(millis);
        }

        if let Some(value) = lookup("ELECTION_CLOSES_IN_MINUTES") {
            config.closes_in_minutes = value
                .trim()
                .parse()
                .ok()
                .filter(|minutes: &i64| *minutes >= 0 && Countdown::closing_in(*minutes).is_some())
                .ok_or(ConfigError::InvalidVar { name: "ELECTION_CLOSES_IN_MINUTES", value })?;
        }

        Ok(config)
    }

    pub fn load_catalog(&self) -> Result<Catalog, ConfigError> {
        match &self.catalog_path {
            Some(path) => Catalog::load(path),
            None => {
                info!("BALLOT_CATALOG_PATH not set, using the built-in sample election");
                Ok(sample_catalog()?)
            }
        }
    }
}
