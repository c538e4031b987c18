//! sg-core: seeded section graph generation
//!
//! Assembles room-like sections into a connected level graph. Sections are
//! picked from a catalog, placed on a grid behind each other's exits, and
//! linked in both directions until every category reaches its population
//! target. The same configuration and seed always produce the same graph.
//!
//! The crate has no I/O beyond reading a JSON configuration.

pub mod builder;
pub mod config;
pub mod error;
pub mod gateway;
pub mod graph;
pub mod rules;
pub mod section;

mod rng;

pub use builder::{LevelBuilder, build, builder_for, start_generation};
pub use config::{CompletionPolicy, DEFAULT_MAX_ITERATIONS, GeneratorConfig};
pub use error::{ConfigError, GenerationError};
pub use gateway::{ActivationLog, SceneGateway, SectionActivator};
pub use graph::{GraphStatus, LevelGraph};
pub use rng::{DrawRecord, SectionRng};
pub use rules::{RuleSet, TransitionRule};
