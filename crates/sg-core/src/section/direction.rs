//! Exit directions and grid positions

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Distance in world units between the origins of two adjacent sections
pub const ROOM_PITCH: f32 = 27.0;

/// Direction an exit faces
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum Direction {
    #[serde(alias = "Top")]
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
    /// Exit with no usable direction
    #[default]
    #[serde(alias = "none")]
    None = 4,
}

impl Direction {
    /// The four usable directions, in exit-table order
    pub const CARDINAL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// The direction an exit on the neighbouring section must face
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::None => Direction::None,
        }
    }

    /// Unit step on the section grid. Up is north (+y), Down is south (-y).
    pub const fn grid_offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::None => (0, 0),
        }
    }

    pub const fn is_cardinal(self) -> bool {
        !matches!(self, Direction::None)
    }
}

/// Cell on the section grid. One cell is `ROOM_PITCH` world units wide.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const ORIGIN: GridPos = GridPos { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Neighbouring cell through an exit facing `direction`
    pub const fn step(self, direction: Direction) -> GridPos {
        let (dx, dy) = direction.grid_offset();
        GridPos {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// World-space origin of a section in this cell, as `[x, y, z]` with y up.
    /// Grid north maps to world +z.
    pub fn world_position(self) -> [f32; 3] {
        [
            self.x as f32 * ROOM_PITCH,
            0.0,
            self.y as f32 * ROOM_PITCH,
        ]
    }
}

impl core::fmt::Display for GridPos {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
