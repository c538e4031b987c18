//! Section categories and templates

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::Direction;

/// Default percentage chance that an exit is left as a dead end in a pass
pub const DEFAULT_DEAD_END_CHANCE: u8 = 30;

/// Section category
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
    Display, EnumIter,
)]
#[repr(u8)]
pub enum Category {
    /// Where the player starts; always exactly one, at the origin
    #[serde(alias = "SpawnRoom")]
    Spawn = 0,
    #[default]
    #[serde(alias = "CommonRoom")]
    Common = 1,
    #[serde(alias = "TreasureRoom")]
    Treasure = 2,
    Shop = 3,
    #[serde(alias = "BossRoom")]
    Boss = 4,
}

impl Category {
    /// Map glyph used by the ascii renderer
    pub const fn glyph(self) -> char {
        match self {
            Category::Spawn => '@',
            Category::Common => '#',
            Category::Treasure => '$',
            Category::Shop => 'S',
            Category::Boss => 'B',
        }
    }
}

/// Exit slot on a template
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExitSlotDef {
    pub direction: Direction,
    /// Where the crossing sits, relative to the section origin
    #[serde(default)]
    pub offset: [f32; 3],
}

impl ExitSlotDef {
    pub const fn new(direction: Direction) -> Self {
        Self {
            direction,
            offset: [0.0; 3],
        }
    }

    pub const fn with_offset(mut self, offset: [f32; 3]) -> Self {
        self.offset = offset;
        self
    }
}

fn default_dead_end_chance() -> u8 {
    DEFAULT_DEAD_END_CHANCE
}

/// A placeable section prototype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionTemplate {
    pub name: String,
    pub category: Category,
    pub exits: Vec<ExitSlotDef>,
    /// Percentage (0-100) that a free exit is skipped in an expansion pass
    #[serde(default = "default_dead_end_chance")]
    pub dead_end_chance: u8,
}

impl SectionTemplate {
    /// Create a template with one exit per direction and the default dead-end chance
    pub fn new(name: impl Into<String>, category: Category, directions: &[Direction]) -> Self {
        Self {
            name: name.into(),
            category,
            exits: directions.iter().copied().map(ExitSlotDef::new).collect(),
            dead_end_chance: DEFAULT_DEAD_END_CHANCE,
        }
    }

    pub fn with_dead_end_chance(mut self, chance: u8) -> Self {
        self.dead_end_chance = chance;
        self
    }

    /// Check if this template exposes an exit facing `direction`
    pub fn has_exit(&self, direction: Direction) -> bool {
        self.exits.iter().any(|e| e.direction == direction)
    }
}
