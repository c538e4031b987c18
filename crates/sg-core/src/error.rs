//! Error types for configuration and generation

use thiserror::Error;

use crate::section::{Category, Direction, GridPos, SectionId};

/// Configuration problems, all detected before any section is placed
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("catalog has no {0} section template")]
    MissingSpawnTemplate(Category),

    #[error("more than one transition rule for category {0}")]
    DuplicateRule(Category),

    #[error("rule for {from} allows {to} as a successor; only the origin may hold a spawn section")]
    SpawnSuccessor { from: Category, to: Category },

    #[error("spawn rule allows {min}..={max} instances but exactly one spawn section is always placed")]
    SpawnCountOutOfRange { min: u32, max: u32 },

    #[error("template '{template}' has dead-end chance {chance}, expected 0..=100")]
    DeadEndChanceOutOfRange { template: String, chance: u8 },

    #[error("iteration ceiling must be at least 1")]
    ZeroIterationCeiling,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors raised while building a level graph
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// Category already at its budget. The builder recovers from this by
    /// ending the current expansion pass.
    #[error("placement budget exhausted for {category}")]
    PlacementBudgetExceeded { category: Category },

    #[error("{section} has no free {direction} exit to connect through")]
    MissingExit {
        section: SectionId,
        direction: Direction,
    },

    #[error("{position} is already occupied by {occupant}")]
    PositionOccupied {
        position: GridPos,
        occupant: SectionId,
    },

    #[error("population targets not met after {iterations} expansion passes")]
    NonTermination { iterations: usize },

    #[error("level graph is not complete yet")]
    NotComplete,

    #[error("level graph is already finalized")]
    AlreadyFinalized,

    #[error("level graph is sealed; sections can no longer be placed or connected")]
    GraphSealed,
}
