//! Coordinate and Cell types for the cave grid.

use std::fmt;

/// Integer grid position. `y` grows downward.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// `None` if the result leaves the `i32` range.
    #[must_use]
    pub fn checked_offset(self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Discriminant values are stable — do not reorder.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Cell {
    #[default]
    Empty = 0,
    Rock = 1,
    Sand = 2,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Empty"),
            Self::Rock => write!(f, "Rock"),
            Self::Sand => write!(f, "Sand"),
        }
    }
}

impl Cell {
    /// Rock and Sand both block a falling grain.
    #[must_use]
    pub fn is_solid(self) -> bool {
        self != Self::Empty
    }

    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Self::Empty => '.',
            Self::Rock => '#',
            Self::Sand => 'o',
        }
    }
}
