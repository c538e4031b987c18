//! Placed sections, their exits and crossings

use serde::{Deserialize, Serialize};

use crate::rng::SectionRng;

use super::{Category, Direction, GridPos, SectionTemplate};

/// Index of a section within its level graph
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SectionId(pub usize);

impl core::fmt::Display for SectionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "section #{}", self.0)
    }
}

/// Exit on a placed section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitSlot {
    pub direction: Direction,
    pub owner: SectionId,
    /// Offset of the crossing from the section origin
    pub offset: [f32; 3],
    /// Set once, by `LevelGraph::connect`
    pub(crate) target: Option<SectionId>,
}

impl ExitSlot {
    pub fn target(&self) -> Option<SectionId> {
        self.target
    }

    pub fn is_free(&self) -> bool {
        self.target.is_none()
    }
}

/// Traversable doorway materialized on a taken exit at finalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crossing {
    pub section: SectionId,
    pub exit: Direction,
    pub target: SectionId,
    /// World position of the crossing
    pub position: [f32; 3],
}

/// A template placed on the grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionInstance {
    pub id: SectionId,
    pub template: String,
    pub category: Category,
    pub position: GridPos,
    /// Whether the section starts active in the scene
    pub active: bool,
    pub(crate) exits: Vec<ExitSlot>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub(crate) crossings: Vec<Crossing>,
    #[serde(skip)]
    dead_end_chance: u8,
}

impl SectionInstance {
    pub(crate) fn from_template(
        id: SectionId,
        template: &SectionTemplate,
        position: GridPos,
        active: bool,
    ) -> Self {
        let exits = template
            .exits
            .iter()
            .map(|def| ExitSlot {
                direction: def.direction,
                owner: id,
                offset: def.offset,
                target: None,
            })
            .collect();

        Self {
            id,
            template: template.name.clone(),
            category: template.category,
            position,
            active,
            exits,
            crossings: Vec::new(),
            dead_end_chance: template.dead_end_chance,
        }
    }

    pub fn exits(&self) -> &[ExitSlot] {
        &self.exits
    }

    pub fn crossings(&self) -> &[Crossing] {
        &self.crossings
    }

    /// First exit facing `direction`
    pub fn exit(&self, direction: Direction) -> Option<&ExitSlot> {
        self.exits.iter().find(|e| e.direction == direction)
    }

    pub(crate) fn free_exit_index(&self, direction: Direction) -> Option<usize> {
        self.exits
            .iter()
            .position(|e| e.direction == direction && e.is_free())
    }

    /// Target of the exit facing `direction`, if connected
    pub fn target_of(&self, direction: Direction) -> Option<SectionId> {
        self.exit(direction).and_then(ExitSlot::target)
    }

    /// Exits without a target whose dead-end roll passed this time.
    ///
    /// Draws once per unconnected exit, in exit order. Every call rolls
    /// again, so evaluate once per pass and keep the result.
    pub fn free_exits(&self, rng: &mut SectionRng) -> Vec<Direction> {
        let mut free = Vec::new();
        for exit in &self.exits {
            if !exit.is_free() {
                continue;
            }
            if rng.rn2(100) > u32::from(self.dead_end_chance) {
                free.push(exit.direction);
            }
        }
        free
    }

    /// Exits that lead to another section
    pub fn taken_exits(&self) -> impl Iterator<Item = &ExitSlot> {
        self.exits.iter().filter(|e| !e.is_free())
    }

    /// Direction -> target table, one entry per exit
    pub fn exit_table(&self) -> Vec<(Direction, Option<SectionId>)> {
        self.exits.iter().map(|e| (e.direction, e.target)).collect()
    }

    /// Build a crossing for every taken exit
    pub(crate) fn materialize_crossings(&mut self) {
        let origin = self.position.world_position();
        self.crossings = self
            .exits
            .iter()
            .filter_map(|exit| {
                exit.target.map(|target| Crossing {
                    section: self.id,
                    exit: exit.direction,
                    target,
                    position: [
                        origin[0] + exit.offset[0],
                        origin[1] + exit.offset[1],
                        origin[2] + exit.offset[2],
                    ],
                })
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hall() -> SectionTemplate {
        SectionTemplate::new(
            "hall",
            Category::Common,
            &[Direction::Up, Direction::Down, Direction::Left],
        )
    }

    #[test]
    fn test_from_template_copies_exits() {
        let s = SectionInstance::from_template(SectionId(4), &hall(), GridPos::new(1, 2), false);
        assert_eq!(s.exits().len(), 3);
        assert!(s.exits().iter().all(|e| e.owner == SectionId(4) && e.is_free()));
        assert_eq!(s.category, Category::Common);
        assert!(!s.active);
        assert_eq!(s.target_of(Direction::Up), None);
        assert!(s.exit(Direction::Right).is_none());
    }

    #[test]
    fn test_free_exits_zero_chance_keeps_most() {
        let s = SectionInstance::from_template(
            SectionId(0),
            &hall().with_dead_end_chance(0),
            GridPos::ORIGIN,
            true,
        );
        let mut rng = SectionRng::new(1);
        let mut kept = 0;
        for _ in 0..100 {
            kept += s.free_exits(&mut rng).len();
        }
        // rn2(100) > 0 fails only on a zero roll
        assert!(kept > 270);
        assert_eq!(rng.draws(), 300);
    }

    #[test]
    fn test_free_exits_full_chance_keeps_none() {
        let s = SectionInstance::from_template(
            SectionId(0),
            &hall().with_dead_end_chance(100),
            GridPos::ORIGIN,
            true,
        );
        let mut rng = SectionRng::new(1);
        for _ in 0..50 {
            assert!(s.free_exits(&mut rng).is_empty());
        }
    }

    #[test]
    fn test_free_exits_skip_taken_without_drawing() {
        let mut s = SectionInstance::from_template(SectionId(0), &hall(), GridPos::ORIGIN, true);
        s.exits[0].target = Some(SectionId(1));
        let mut rng = SectionRng::new(9);
        let free = s.free_exits(&mut rng);
        assert!(!free.contains(&Direction::Up));
        assert_eq!(rng.draws(), 2);
        assert_eq!(s.taken_exits().count(), 1);
    }

    #[test]
    fn test_crossings_hold_direct_ids() {
        let mut s = SectionInstance::from_template(SectionId(2), &hall(), GridPos::new(0, -1), true);
        s.exits[0].target = Some(SectionId(0));
        s.exits[0].offset = [0.0, 0.0, 13.5];
        s.materialize_crossings();

        assert_eq!(s.crossings().len(), 1);
        let c = &s.crossings()[0];
        assert_eq!(c.section, SectionId(2));
        assert_eq!(c.exit, Direction::Up);
        assert_eq!(c.target, SectionId(0));
        assert_eq!(c.position, [0.0, 0.0, -27.0 + 13.5]);
    }
}
