//! Sparse-grid falling sand simulation for rock caves.
//!
//! Rock is drawn from path descriptions into a [`Grid`]; a [`Simulator`]
//! then drops sand from a fixed source until it escapes into the abyss or
//! piles up to block the source.

pub mod cell;
pub mod error;
pub mod grain;
pub mod path;
pub mod render;
pub mod sim;

#[cfg(test)]
mod sim_regression_test;

use std::collections::HashMap;

use wasm_bindgen::prelude::*;

pub use cell::{Cell, Coord};
pub use error::CaveError;
pub use grain::{Boundary, Grain, GrainState};
pub use render::Snapshot;
pub use sim::{simulate, Halt, Outcome, RunMode, SimConfig, Simulator};

/// Sparse cave map. Only Rock and Sand are stored; anything absent is Empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    cells: HashMap<Coord, Cell>,
    lowest_rock: Option<i32>,
    rocks: usize,
    sand: usize,
}

impl Grid {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw every path as rock. Consecutive vertices must share a row or a
    /// column; redrawing a rock cell is a no-op.
    ///
    /// # Errors
    ///
    /// `MalformedSegment` on the first diagonal vertex pair. No grid is
    /// returned in that case.
    pub fn from_paths<I, P>(paths: I) -> Result<Self, CaveError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[Coord]>,
    {
        let mut grid = Self::new();
        let mut count = 0usize;
        for path in paths {
            for pair in path.as_ref().windows(2) {
                for coord in path::segment(pair[0], pair[1])? {
                    grid.set(coord, Cell::Rock);
                }
            }
            count += 1;
        }
        log::debug!(
            "built cave from {} paths: {} rock cells, lowest rock row {:?}",
            count,
            grid.rocks,
            grid.lowest_rock
        );
        Ok(grid)
    }

    /// Parse path text (one path per line) and draw it.
    ///
    /// # Errors
    ///
    /// Any parse error from [`path::parse_paths`] or geometry error from
    /// [`Grid::from_paths`].
    pub fn parse(text: &str) -> Result<Self, CaveError> {
        Self::from_paths(path::parse_paths(text)?)
    }

    #[must_use]
    pub fn is_free(&self, coord: Coord) -> bool {
        !self.cell(coord).is_solid()
    }

    /// Lenient lookup: unrecorded coordinates are Empty.
    #[must_use]
    pub fn cell(&self, coord: Coord) -> Cell {
        self.cells.get(&coord).copied().unwrap_or_default()
    }

    /// Strict lookup for coordinates the caller knows are populated.
    ///
    /// # Errors
    ///
    /// `MissingCell` if nothing is recorded at `coord`.
    pub fn get(&self, coord: Coord) -> Result<Cell, CaveError> {
        self.cells
            .get(&coord)
            .copied()
            .ok_or(CaveError::MissingCell(coord))
    }

    /// Record Rock or Sand at `coord`. Empty is ignored, cells never shrink.
    ///
    /// A cell moves from Empty to Rock or Sand at most once; only Rock may be
    /// written over itself.
    pub fn set(&mut self, coord: Coord, cell: Cell) {
        if cell == Cell::Empty {
            return;
        }
        let previous = self.cells.insert(coord, cell);
        debug_assert!(
            previous.is_none() || (previous == Some(Cell::Rock) && cell == Cell::Rock),
            "illegal transition at {coord}: {previous:?} -> {cell}"
        );
        if previous == Some(cell) {
            return;
        }
        match previous {
            Some(Cell::Rock) => self.rocks -= 1,
            Some(Cell::Sand) => self.sand -= 1,
            Some(Cell::Empty) | None => {}
        }
        match cell {
            Cell::Rock => {
                self.rocks += 1;
                self.lowest_rock = Some(self.lowest_rock.map_or(coord.y, |y| y.max(coord.y)));
            }
            Cell::Sand => self.sand += 1,
            Cell::Empty => {}
        }
    }

    /// Largest `y` of any rock cell.
    ///
    /// # Errors
    ///
    /// `EmptyMap` if no rock has been placed.
    pub fn lowest_rock_row(&self) -> Result<i32, CaveError> {
        self.lowest_rock.ok_or(CaveError::EmptyMap)
    }

    #[must_use]
    pub fn rock_count(&self) -> usize {
        self.rocks
    }

    #[must_use]
    pub fn sand_count(&self) -> usize {
        self.sand
    }

    /// Number of recorded (non-empty) cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coord, Cell)> + '_ {
        self.cells.iter().map(|(&coord, &cell)| (coord, cell))
    }

    /// Inclusive corners of the box around every recorded cell.
    #[must_use]
    pub fn bounds(&self) -> Option<(Coord, Coord)> {
        self.cells.keys().fold(None, |acc, &c| match acc {
            None => Some((c, c)),
            Some((lo, hi)) => Some((
                Coord::new(lo.x.min(c.x), lo.y.min(c.y)),
                Coord::new(hi.x.max(c.x), hi.y.max(c.y)),
            )),
        })
    }
}

/// Grains settled before the first one falls into the abyss.
///
/// # Errors
///
/// Parse, geometry or empty-cave errors as a `JsError`.
#[wasm_bindgen]
pub fn open_abyss_count(paths: &str) -> Result<u32, JsError> {
    Ok(simulate(paths, RunMode::OpenAbyss)?.settled)
}

/// Grains settled on the infinite floor, including the one that blocks the
/// source.
///
/// # Errors
///
/// Parse, geometry or empty-cave errors as a `JsError`.
#[wasm_bindgen]
pub fn floor_bounded_count(paths: &str) -> Result<u32, JsError> {
    Ok(simulate(paths, RunMode::FloorBounded)?.settled)
}

/// Text snapshot of the cave after a full run, source included.
///
/// # Errors
///
/// Parse, geometry or empty-cave errors as a `JsError`.
#[wasm_bindgen]
pub fn render_cave(paths: &str, floor_bounded: bool) -> Result<String, JsError> {
    let mode = if floor_bounded {
        RunMode::FloorBounded
    } else {
        RunMode::OpenAbyss
    };
    let config = SimConfig::default().with_mode(mode);
    let mut sim = Simulator::new(Grid::parse(paths)?, config)?;
    sim.run();
    let source = sim.config().source;
    // The source widens the box, so the snapshot is never empty.
    Ok(Snapshot::capture_with(sim.grid(), &[source])
        .map_or_else(String::new, |snapshot| snapshot.to_string()))
}
