//! Ordered collection of section templates

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::rng::SectionRng;

use super::{Category, SectionTemplate};

/// Section templates available to a build, in configuration order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    templates: Vec<SectionTemplate>,
}

impl Catalog {
    pub fn new(templates: Vec<SectionTemplate>) -> Self {
        Self { templates }
    }

    pub fn templates(&self) -> &[SectionTemplate] {
        &self.templates
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Templates of one category, in catalog order
    pub fn of_category(&self, category: Category) -> impl Iterator<Item = &SectionTemplate> {
        self.templates.iter().filter(move |t| t.category == category)
    }

    pub fn contains_category(&self, category: Category) -> bool {
        self.of_category(category).next().is_some()
    }

    /// Template checks every build runs before placing anything: dead-end
    /// chances within 0..=100 and at least one spawn template.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(t) = self.templates.iter().find(|t| t.dead_end_chance > 100) {
            return Err(ConfigError::DeadEndChanceOutOfRange {
                template: t.name.clone(),
                chance: t.dead_end_chance,
            });
        }
        if !self.contains_category(Category::Spawn) {
            return Err(ConfigError::MissingSpawnTemplate(Category::Spawn));
        }
        Ok(())
    }

    /// Uniformly random template of `category`.
    ///
    /// Draws only when at least one template matches.
    pub fn random_of(&self, category: Category, rng: &mut SectionRng) -> Option<&SectionTemplate> {
        let matching: Vec<&SectionTemplate> = self.of_category(category).collect();
        rng.choose(&matching).copied()
    }
}

impl From<Vec<SectionTemplate>> for Catalog {
    fn from(templates: Vec<SectionTemplate>) -> Self {
        Self::new(templates)
    }
}
