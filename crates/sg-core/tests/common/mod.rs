//! Shared fixtures for integration tests

#![allow(dead_code)]

use sg_core::section::{Catalog, Category, Direction, SectionTemplate};
use sg_core::{LevelGraph, RuleSet, TransitionRule};

/// Spawn with one Down exit, Common with Up and Down
pub fn scenario_a_catalog() -> Catalog {
    Catalog::new(vec![
        SectionTemplate::new("entrance", Category::Spawn, &[Direction::Down]),
        SectionTemplate::new("corridor", Category::Common, &[Direction::Up, Direction::Down]),
    ])
}

pub fn scenario_a_rules() -> RuleSet {
    RuleSet::new(vec![
        TransitionRule::new(Category::Spawn, &[Category::Common], 1, 1),
        TransitionRule::new(Category::Common, &[], 1, 1),
    ])
    .unwrap()
}

/// Every template has all four exits, so connections never fail
pub fn dungeon_catalog() -> Catalog {
    Catalog::new(vec![
        SectionTemplate::new("entrance", Category::Spawn, &Direction::CARDINAL)
            .with_dead_end_chance(10),
        SectionTemplate::new("crossroads", Category::Common, &Direction::CARDINAL),
        SectionTemplate::new("gallery", Category::Common, &Direction::CARDINAL)
            .with_dead_end_chance(50),
        SectionTemplate::new("vault", Category::Treasure, &Direction::CARDINAL),
        SectionTemplate::new("market", Category::Shop, &Direction::CARDINAL),
        SectionTemplate::new("throne", Category::Boss, &Direction::CARDINAL),
    ])
}

pub fn dungeon_rules() -> RuleSet {
    RuleSet::new(vec![
        TransitionRule::new(Category::Spawn, &[Category::Common], 1, 1),
        TransitionRule::new(
            Category::Common,
            &[Category::Common, Category::Treasure, Category::Shop, Category::Boss],
            4,
            8,
        ),
        TransitionRule::new(Category::Treasure, &[Category::Common], 0, 2),
        TransitionRule::new(Category::Shop, &[Category::Common], 0, 1),
        TransitionRule::new(Category::Boss, &[], 1, 1),
    ])
    .unwrap()
}

/// Every taken exit is matched by exactly one opposite exit on its target
pub fn assert_bidirectional(graph: &LevelGraph) {
    for section in graph.sections() {
        for exit in section.taken_exits() {
            let target = graph.section(exit.target().unwrap()).unwrap();
            let back: Vec<_> = target
                .exits()
                .iter()
                .filter(|e| e.target() == Some(section.id))
                .collect();
            assert_eq!(back.len(), 1, "{} <-> {}", section.id, target.id);
            assert_eq!(back[0].direction, exit.direction.opposite());
            assert_eq!(target.position, section.position.step(exit.direction));
        }
    }
}

/// No two sections share a grid cell
pub fn assert_unique_positions(graph: &LevelGraph) {
    let mut seen = std::collections::HashSet::new();
    for section in graph.sections() {
        assert!(seen.insert(section.position), "duplicate {}", section.position);
    }
}

/// Each rule's category count lies within its bounds
pub fn assert_population_bounds(graph: &LevelGraph, rules: &RuleSet) {
    for rule in rules.rules() {
        let count = graph.count_of(rule.category);
        assert!(
            (rule.min()..=rule.max()).contains(&count),
            "{} count {} outside {}..={}",
            rule.category,
            count,
            rule.min(),
            rule.max()
        );
    }
}

/// Exactly one spawn section, at the origin
pub fn assert_single_spawn(graph: &LevelGraph) {
    assert_eq!(graph.count_of(Category::Spawn), 1);
    assert_eq!(
        graph.spawn().map(|s| s.position),
        Some(sg_core::section::GridPos::ORIGIN)
    );
}
