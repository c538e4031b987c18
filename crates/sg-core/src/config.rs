//! Generator configuration
//!
//! Loaded from JSON by the CLI, or built in code.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::rules::TransitionRule;
use crate::section::Catalog;

/// Default ceiling on expansion passes before a build gives up
pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;

/// How the builder decides that every category is populated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionPolicy {
    /// Draw one target per rule at build start. The target is both the
    /// completion goal and the category's budget for the run.
    #[default]
    FixedTarget,
    /// Draw a fresh target per rule on every check; budget is the rule
    /// maximum. Relies on the iteration ceiling to stop.
    Redraw,
}

fn default_disable_sections() -> bool {
    true
}

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

/// Everything a build needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub catalog: Catalog,
    #[serde(default)]
    pub rules: Vec<TransitionRule>,
    /// Non-spawn sections start inactive
    #[serde(default = "default_disable_sections")]
    pub disable_sections_on_start: bool,
    /// Fixed seed; a fresh one is derived per run when absent
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    #[serde(default)]
    pub completion: CompletionPolicy,
}

impl GeneratorConfig {
    pub fn new(catalog: impl Into<Catalog>, rules: Vec<TransitionRule>) -> Self {
        Self {
            catalog: catalog.into(),
            rules,
            disable_sections_on_start: true,
            seed: None,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            completion: CompletionPolicy::default(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_completion(mut self, completion: CompletionPolicy) -> Self {
        self.completion = completion;
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Checks that do not depend on the rule set
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_iterations == 0 {
            return Err(ConfigError::ZeroIterationCeiling);
        }
        self.catalog.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::{Category, Direction, SectionTemplate};

    const MINIMAL: &str = r#"{
        "catalog": [
            {"name": "start", "category": "Spawn", "exits": [{"direction": "Down"}]}
        ],
        "rules": [
            {"category": "Spawn", "allowed": ["Common"], "min_count": 1, "max_count": 1}
        ]
    }"#;

    #[test]
    fn test_defaults_from_json() {
        let config = GeneratorConfig::from_json_str(MINIMAL).unwrap();
        assert!(config.disable_sections_on_start);
        assert_eq!(config.seed, None);
        assert_eq!(config.max_iterations, DEFAULT_MAX_ITERATIONS);
        assert_eq!(config.completion, CompletionPolicy::FixedTarget);
        assert_eq!(config.rules[0].allowed, vec![Category::Common]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_policy_names() {
        let json = MINIMAL.replacen('{', r#"{"completion": "redraw", "seed": 9,"#, 1);
        let config = GeneratorConfig::from_json_str(&json).unwrap();
        assert_eq!(config.completion, CompletionPolicy::Redraw);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn test_validate_rejects_zero_ceiling() {
        let config = GeneratorConfig::from_json_str(MINIMAL)
            .unwrap()
            .with_max_iterations(0);
        assert!(matches!(config.validate(), Err(ConfigError::ZeroIterationCeiling)));
    }

    #[test]
    fn test_validate_rejects_dead_end_chance() {
        let config = GeneratorConfig::new(
            vec![
                SectionTemplate::new("start", Category::Spawn, &[Direction::Down])
                    .with_dead_end_chance(101),
            ],
            vec![],
        );
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DeadEndChanceOutOfRange { chance: 101, .. })
        ));
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        assert!(matches!(
            GeneratorConfig::from_json_str("{"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            GeneratorConfig::from_path("/nonexistent/level.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
