//! Section data model
//!
//! Templates, placed instances, exits, and the catalog they come from.

mod catalog;
mod direction;
mod instance;
mod template;

pub use catalog::Catalog;
pub use direction::{Direction, GridPos, ROOM_PITCH};
pub use instance::{Crossing, ExitSlot, SectionId, SectionInstance};
pub use template::{Category, DEFAULT_DEAD_END_CHANCE, ExitSlotDef, SectionTemplate};
