use super::Catalog;
use crate::error::CatalogError;
use crate::models::{Aspirant, Category};
use std::sync::Arc;

/// Which aspirant list the browse page is showing. Selecting a category
/// never touches ballots or the tally.
#[derive(Debug, Clone)]
pub struct CategoryBrowser {
    catalog: Arc<Catalog>,
    selected: Option<String>,
}

impl CategoryBrowser {
    /// Starts on the first declared category.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let selected = catalog.categories().first().map(|category| category.id.clone());
        Self { catalog, selected }
    }

    pub fn categories(&self) -> &[Category] {
        self.catalog.categories()
    }

    pub fn current(&self) -> Option<&Category> {
        self.selected.as_deref().and_then(|id| self.catalog.category(id))
    }

    pub fn select(&mut self, id: &str) -> Result<&Category, CatalogError> {
        let category = self
            .catalog
            .category(id)
            .ok_or_else(|| CatalogError::UnknownCategory(id.to_string()))?;
        self.selected = Some(category.id.clone());
        Ok(category)
    }

    pub fn aspirants(&self) -> &[Aspirant] {
        self.current().map(|category| category.aspirants.as_slice()).unwrap_or(&[])
    }

    pub fn details(&self, aspirant_id: u32) -> Result<&Aspirant, CatalogError> {
        self.aspirants()
            .iter()
            .find(|aspirant| aspirant.id == aspirant_id)
            .ok_or(CatalogError::UnknownAspirant(aspirant_id))
    }
}
