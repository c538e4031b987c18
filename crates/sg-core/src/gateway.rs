//! Runtime section switching over a finished level graph
//!
//! The application owns the scene; it receives activation requests through
//! `SectionActivator`. The gateway only reads the graph.

use crate::error::GenerationError;
use crate::graph::LevelGraph;
use crate::section::{Crossing, Direction, SectionId};

/// Receives activation changes for section representations in the scene
pub trait SectionActivator {
    fn activate(&mut self, section: SectionId);
    fn deactivate(&mut self, section: SectionId);
}

/// Records activation requests in order; useful for headless runs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivationLog {
    pub events: Vec<(SectionId, bool)>,
}

impl SectionActivator for ActivationLog {
    fn activate(&mut self, section: SectionId) {
        self.events.push((section, true));
    }

    fn deactivate(&mut self, section: SectionId) {
        self.events.push((section, false));
    }
}

/// Moves the player between sections of a finalized level
#[derive(Debug)]
pub struct SceneGateway<'g, A: SectionActivator> {
    graph: &'g LevelGraph,
    activator: A,
    active: Vec<bool>,
    current: Option<SectionId>,
}

impl<'g, A: SectionActivator> SceneGateway<'g, A> {
    /// Start in the spawn section, with activation seeded from the graph.
    ///
    /// The graph must be finalized; crossings only exist once it is `Ready`.
    pub fn new(graph: &'g LevelGraph, activator: A) -> Result<Self, GenerationError> {
        if !graph.is_ready() {
            return Err(GenerationError::NotComplete);
        }
        Ok(Self {
            graph,
            activator,
            active: graph.sections().iter().map(|s| s.active).collect(),
            current: graph.spawn().map(|s| s.id),
        })
    }

    pub fn current(&self) -> Option<SectionId> {
        self.current
    }

    pub fn is_active(&self, section: SectionId) -> bool {
        self.active.get(section.0).copied().unwrap_or(false)
    }

    pub fn activator(&self) -> &A {
        &self.activator
    }

    pub fn into_activator(self) -> A {
        self.activator
    }

    /// Section behind `direction` of `section`
    pub fn target_of(&self, section: SectionId, direction: Direction) -> Option<SectionId> {
        self.graph.target_of(section, direction)
    }

    /// Enter `section` through its exit facing `entry`.
    ///
    /// Does nothing when the section has no such exit. Returns whether the
    /// section was entered.
    pub fn go_to_this_section(&mut self, section: SectionId, entry: Direction) -> bool {
        let Some(instance) = self.graph.section(section) else {
            return false;
        };
        if instance.exit(entry).is_none() {
            return false;
        }

        self.set_active(section, true);
        self.current = Some(section);
        true
    }

    /// Walk through `crossing`: enter its target through the opposite exit,
    /// then deactivate the section left behind.
    pub fn traverse(&mut self, crossing: &Crossing) -> Option<SectionId> {
        if !self.go_to_this_section(crossing.target, crossing.exit.opposite()) {
            return None;
        }
        self.set_active(crossing.section, false);
        Some(crossing.target)
    }

    /// Walk through the exit of the current section facing `direction`
    pub fn traverse_from_current(&mut self, direction: Direction) -> Option<SectionId> {
        let graph = self.graph;
        let crossing = graph
            .section(self.current?)?
            .crossings()
            .iter()
            .find(|c| c.exit == direction)?;
        self.traverse(crossing)
    }

    fn set_active(&mut self, section: SectionId, active: bool) {
        if let Some(flag) = self.active.get_mut(section.0) {
            *flag = active;
        }
        if active {
            self.activator.activate(section);
        } else {
            self.activator.deactivate(section);
        }
    }
}
