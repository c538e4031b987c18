//! Per-category transition rules
//!
//! A rule bounds how many sections of its category a level holds and lists
//! which categories may be generated next to one of them.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::rng::SectionRng;
use crate::section::{Catalog, Category};

/// Population bounds and allowed successors for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRule {
    pub category: Category,
    /// Categories that may be placed behind an exit of this category
    #[serde(default, alias = "allowed_successors")]
    pub allowed: Vec<Category>,
    #[serde(default)]
    pub min_count: i32,
    #[serde(default)]
    pub max_count: i32,
}

impl TransitionRule {
    pub fn new(category: Category, allowed: &[Category], min_count: i32, max_count: i32) -> Self {
        Self {
            category,
            allowed: allowed.to_vec(),
            min_count,
            max_count,
        }
    }

    /// Counts made non-negative, max raised to at least min
    pub fn normalized(mut self) -> Self {
        let min = clamp_count(self.min_count.unsigned_abs());
        let max = clamp_count(self.max_count.unsigned_abs()).max(min);
        self.min_count = min;
        self.max_count = max;
        self
    }

    pub fn min(&self) -> usize {
        self.min_count.max(0) as usize
    }

    pub fn max(&self) -> usize {
        self.max_count.max(0) as usize
    }

    /// Uniformly random allowed successor.
    ///
    /// An empty successor list falls back to `Common` without drawing.
    pub fn random_successor(&self, rng: &mut SectionRng) -> Category {
        rng.choose(&self.allowed).copied().unwrap_or(Category::Common)
    }
}

fn clamp_count(n: u32) -> i32 {
    n.min(i32::MAX as u32) as i32
}

/// Validated, normalized rules in configuration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RuleSet {
    rules: Vec<TransitionRule>,
}

impl RuleSet {
    /// Normalize and validate rules.
    ///
    /// Rejects duplicate categories, rules that allow spawn sections as
    /// successors, and a spawn rule whose bounds exclude exactly one.
    ///
    /// A spawn successor is refused even though the spawn budget would stop
    /// a second spawn at build time. Legacy exports listing `SpawnRoom` must
    /// drop it from `allowed`.
    pub fn new(rules: Vec<TransitionRule>) -> Result<Self, ConfigError> {
        let mut normalized: Vec<TransitionRule> = Vec::with_capacity(rules.len());

        for rule in rules {
            let rule = rule.normalized();

            if normalized.iter().any(|r| r.category == rule.category) {
                return Err(ConfigError::DuplicateRule(rule.category));
            }
            if rule.allowed.contains(&Category::Spawn) {
                return Err(ConfigError::SpawnSuccessor {
                    from: rule.category,
                    to: Category::Spawn,
                });
            }
            if rule.category == Category::Spawn && !(rule.min()..=rule.max()).contains(&1) {
                return Err(ConfigError::SpawnCountOutOfRange {
                    min: rule.min() as u32,
                    max: rule.max() as u32,
                });
            }

            normalized.push(rule);
        }

        Ok(Self { rules: normalized })
    }

    pub fn rules(&self) -> &[TransitionRule] {
        &self.rules
    }

    pub fn rule_for(&self, category: Category) -> Option<&TransitionRule> {
        self.rules.iter().find(|r| r.category == category)
    }

    /// Successor for a section of `category`.
    ///
    /// A category without a rule behaves like one with no successors.
    pub fn successor(&self, category: Category, rng: &mut SectionRng) -> Category {
        match self.rule_for(category) {
            Some(rule) => rule.random_successor(rng),
            None => Category::Common,
        }
    }

    /// Configured maximum; zero for categories without a rule
    pub fn max_count(&self, category: Category) -> usize {
        self.rule_for(category).map_or(0, TransitionRule::max)
    }

    /// Log rules that can never be satisfied by the catalog.
    ///
    /// Returns the number of problems found.
    pub fn warn_on_catalog_gaps(&self, catalog: &Catalog) -> usize {
        let mut gaps = 0;
        for rule in &self.rules {
            if !catalog.contains_category(rule.category) && rule.min() > 0 {
                warn!(
                    "rule for {} needs at least {} sections but the catalog has no {} template",
                    rule.category,
                    rule.min(),
                    rule.category
                );
                gaps += 1;
            }
            for next in &rule.allowed {
                if !catalog.contains_category(*next) {
                    warn!(
                        "rule for {} allows {} but the catalog has no {} template",
                        rule.category, next, next
                    );
                    gaps += 1;
                }
            }
        }
        gaps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::{Direction, SectionTemplate};

    #[test]
    fn test_normalization() {
        let rule = TransitionRule::new(Category::Common, &[], -3, 1).normalized();
        assert_eq!(rule.min(), 3);
        assert_eq!(rule.max(), 3);

        let rule = TransitionRule::new(Category::Common, &[], 2, -5).normalized();
        assert_eq!((rule.min(), rule.max()), (2, 5));

        let rule = TransitionRule::new(Category::Common, &[], i32::MIN, 0).normalized();
        assert_eq!(rule.min(), i32::MAX as usize);
    }

    #[test]
    fn test_empty_successors_fall_back_to_common() {
        let rule = TransitionRule::new(Category::Boss, &[], 0, 1);
        let mut rng = SectionRng::new(5);
        assert_eq!(rule.random_successor(&mut rng), Category::Common);
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_successor_sampled_from_allowed() {
        let rule = TransitionRule::new(Category::Common, &[Category::Shop, Category::Boss], 0, 1);
        let mut rng = SectionRng::new(5);
        for _ in 0..100 {
            let next = rule.random_successor(&mut rng);
            assert!(next == Category::Shop || next == Category::Boss);
        }
    }

    #[test]
    fn test_rule_set_rejects_duplicates() {
        let err = RuleSet::new(vec![
            TransitionRule::new(Category::Common, &[], 1, 2),
            TransitionRule::new(Category::Common, &[], 0, 1),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateRule(Category::Common)));
    }

    #[test]
    fn test_rule_set_rejects_spawn_successor() {
        let err = RuleSet::new(vec![TransitionRule::new(
            Category::Common,
            &[Category::Spawn],
            0,
            1,
        )])
        .unwrap_err();
        assert!(matches!(err, ConfigError::SpawnSuccessor { .. }));

        let legacy = r#"{"category": "CommonRoom", "allowed": ["SpawnRoom"], "max_count": 2}"#;
        let rule: TransitionRule = serde_json::from_str(legacy).unwrap();
        assert!(matches!(
            RuleSet::new(vec![rule]),
            Err(ConfigError::SpawnSuccessor {
                from: Category::Common,
                to: Category::Spawn
            })
        ));
    }

    #[test]
    fn test_rule_set_rejects_bad_spawn_range() {
        let err = RuleSet::new(vec![TransitionRule::new(Category::Spawn, &[], 2, 3)]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::SpawnCountOutOfRange { min: 2, max: 3 }
        ));
    }

    #[test]
    fn test_missing_rule_defaults() {
        let rules = RuleSet::new(vec![]).unwrap();
        let mut rng = SectionRng::new(5);
        assert_eq!(rules.successor(Category::Shop, &mut rng), Category::Common);
        assert_eq!(rules.max_count(Category::Shop), 0);
    }

    #[test]
    fn test_catalog_gaps_are_counted() {
        let rules = RuleSet::new(vec![
            TransitionRule::new(Category::Spawn, &[Category::Common], 1, 1),
            TransitionRule::new(Category::Boss, &[], 1, 1),
        ])
        .unwrap();
        let catalog = Catalog::new(vec![SectionTemplate::new(
            "start",
            Category::Spawn,
            &[Direction::Down],
        )]);
        // Boss rule unsatisfiable, Common successor missing
        assert_eq!(rules.warn_on_catalog_gaps(&catalog), 2);
    }
}
