//! Level graph: placed sections and their exit connectivity
//!
//! The graph is owned by one build while `InProgress`. Once finalized it
//! only offers read access.

use hashbrown::HashMap;
use serde::Serialize;
use strum::Display;

use crate::error::GenerationError;
use crate::section::{
    Category, Crossing, Direction, GridPos, SectionId, SectionInstance, SectionTemplate,
};

/// Build lifecycle of a level graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Display)]
pub enum GraphStatus {
    /// Sections are still being placed
    #[default]
    InProgress,
    /// Population targets met; crossings not yet materialized
    Complete,
    /// Crossings materialized; read-only
    Ready,
}

/// Placed sections keyed by grid position
#[derive(Debug, Clone, Serialize)]
pub struct LevelGraph {
    seed: u64,
    status: GraphStatus,
    sections: Vec<SectionInstance>,
    #[serde(skip)]
    index: HashMap<GridPos, SectionId>,
}

impl LevelGraph {
    /// Empty graph for a build using `seed`
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            status: GraphStatus::InProgress,
            sections: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Seed that produced (or is producing) this graph
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn status(&self) -> GraphStatus {
        self.status
    }

    pub fn is_ready(&self) -> bool {
        self.status == GraphStatus::Ready
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn sections(&self) -> &[SectionInstance] {
        &self.sections
    }

    pub fn section(&self, id: SectionId) -> Option<&SectionInstance> {
        self.sections.get(id.0)
    }

    /// Section occupying `position`
    pub fn at(&self, position: GridPos) -> Option<&SectionInstance> {
        self.index.get(&position).and_then(|id| self.section(*id))
    }

    pub fn is_occupied(&self, position: GridPos) -> bool {
        self.index.contains_key(&position)
    }

    /// Number of placed sections of `category`
    pub fn count_of(&self, category: Category) -> usize {
        self.sections.iter().filter(|s| s.category == category).count()
    }

    /// The spawn section, if placed
    pub fn spawn(&self) -> Option<&SectionInstance> {
        self.sections.iter().find(|s| s.category == Category::Spawn)
    }

    /// Section behind the exit of `section` facing `direction`
    pub fn target_of(&self, section: SectionId, direction: Direction) -> Option<SectionId> {
        self.section(section)?.target_of(direction)
    }

    /// All crossings, grouped by owning section
    pub fn crossings(&self) -> impl Iterator<Item = &Crossing> {
        self.sections.iter().flat_map(|s| s.crossings().iter())
    }

    fn ensure_in_progress(&self) -> Result<(), GenerationError> {
        if self.status == GraphStatus::InProgress {
            Ok(())
        } else {
            Err(GenerationError::GraphSealed)
        }
    }

    /// Instantiate `template` at `position`
    pub fn place(
        &mut self,
        template: &SectionTemplate,
        position: GridPos,
        active: bool,
    ) -> Result<SectionId, GenerationError> {
        self.ensure_in_progress()?;
        if let Some(existing) = self.index.get(&position) {
            return Err(GenerationError::PositionOccupied {
                position,
                occupant: *existing,
            });
        }

        let id = SectionId(self.sections.len());
        self.sections
            .push(SectionInstance::from_template(id, template, position, active));
        self.index.insert(position, id);
        Ok(id)
    }

    /// Link the `direction` exit of `from` with the opposite exit of `to`.
    ///
    /// Both exits must exist and be free. Either both sides are linked or
    /// neither is.
    pub fn connect(
        &mut self,
        from: SectionId,
        direction: Direction,
        to: SectionId,
    ) -> Result<(), GenerationError> {
        self.ensure_in_progress()?;

        let from_exit = self
            .section(from)
            .and_then(|s| s.free_exit_index(direction))
            .ok_or(GenerationError::MissingExit {
                section: from,
                direction,
            })?;

        let opposite = direction.opposite();
        let to_exit = self
            .section(to)
            .filter(|_| to != from && direction.is_cardinal())
            .and_then(|s| s.free_exit_index(opposite))
            .ok_or(GenerationError::MissingExit {
                section: to,
                direction: opposite,
            })?;

        self.sections[from.0].exits[from_exit].target = Some(to);
        self.sections[to.0].exits[to_exit].target = Some(from);
        Ok(())
    }

    pub(crate) fn mark_complete(&mut self) {
        if self.status == GraphStatus::InProgress {
            self.status = GraphStatus::Complete;
        }
    }

    /// Materialize a crossing on every taken exit of every section.
    ///
    /// Only valid once, after the graph is complete.
    pub fn finalize(&mut self) -> Result<(), GenerationError> {
        match self.status {
            GraphStatus::InProgress => Err(GenerationError::NotComplete),
            GraphStatus::Ready => Err(GenerationError::AlreadyFinalized),
            GraphStatus::Complete => {
                for section in &mut self.sections {
                    section.materialize_crossings();
                }
                self.status = GraphStatus::Ready;
                Ok(())
            }
        }
    }

    /// Compact text map: one glyph per section, `-` and `|` for links.
    ///
    /// North is at the top.
    pub fn render_ascii(&self) -> String {
        if self.sections.is_empty() {
            return String::new();
        }

        let min_x = self.sections.iter().map(|s| s.position.x).min().unwrap_or(0);
        let max_x = self.sections.iter().map(|s| s.position.x).max().unwrap_or(0);
        let min_y = self.sections.iter().map(|s| s.position.y).min().unwrap_or(0);
        let max_y = self.sections.iter().map(|s| s.position.y).max().unwrap_or(0);

        let width = ((max_x - min_x) * 2 + 1) as usize;
        let height = ((max_y - min_y) * 2 + 1) as usize;
        let mut rows = vec![vec![' '; width]; height];

        for section in &self.sections {
            let col = ((section.position.x - min_x) * 2) as usize;
            let row = ((max_y - section.position.y) * 2) as usize;
            rows[row][col] = section.category.glyph();

            for exit in section.taken_exits() {
                match exit.direction {
                    Direction::Right if col + 1 < width => rows[row][col + 1] = '-',
                    Direction::Up if row > 0 => rows[row - 1][col] = '|',
                    _ => {}
                }
            }
        }

        rows.into_iter()
            .map(|r| r.into_iter().collect::<String>().trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
