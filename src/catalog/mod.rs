pub mod browser;
pub mod sample;

use crate::error::{CatalogError, ConfigError};
use crate::models::{Category, Position, ResultsSection};
use log::info;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// On-disk shape of a catalog file.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    positions: Vec<Position>,
    #[serde(default)]
    categories: Vec<Category>,
    #[serde(default)]
    results: Vec<ResultsSection>,
}

/// Read-only election data: the ballot, the aspirant categories and the
/// starting results dataset handed to the tally engine.
#[derive(Debug, Clone)]
pub struct Catalog {
    positions: Vec<Position>,
    categories: Vec<Category>,
    results: Vec<ResultsSection>,
}

impl Catalog {
    pub fn new(
        positions: Vec<Position>,
        categories: Vec<Category>,
        results: Vec<ResultsSection>,
    ) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for position in &positions {
            if !seen.insert(position.id.as_str()) {
                return Err(CatalogError::DuplicatePosition(position.id.clone()));
            }
            if position.candidate_names.is_empty() {
                return Err(CatalogError::EmptyPosition(position.id.clone()));
            }
            let mut names = HashSet::new();
            for name in &position.candidate_names {
                if !names.insert(name.as_str()) {
                    return Err(CatalogError::DuplicateCandidate {
                        position: position.id.clone(),
                        candidate: name.clone(),
                    });
                }
            }
        }

        let mut keys = HashSet::new();
        for section in &results {
            if !keys.insert(section.key.as_str()) {
                return Err(CatalogError::DuplicateSection(section.key.clone()));
            }
        }

        Ok(Self { positions, categories, results })
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Ok(Self::new(file.positions, file.categories, file.results)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&json)?;
        info!(
            "Loaded catalog from {} ({} positions, {} categories, {} results sections)",
            path.display(),
            catalog.positions.len(),
            catalog.categories.len(),
            catalog.results.len()
        );
        Ok(catalog)
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn position(&self, id: &str) -> Option<&Position> {
        self.positions.iter().find(|position| position.id == id)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    /// Starting counts for a fresh tally engine.
    pub fn initial_results(&self) -> Vec<ResultsSection> {
        self.results.clone()
    }
}
