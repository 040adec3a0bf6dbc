//! Drop loop: pour grains from the source until the run halts.

use std::fmt;

use crate::cell::{Cell, Coord};
use crate::error::CaveError;
use crate::grain::{Boundary, Grain, GrainState};
use crate::Grid;

/// Where every grain enters the cave.
pub const DEFAULT_SOURCE: Coord = Coord::new(500, 0);

/// Rows between the lowest rock and the floor in floor-bounded mode.
pub const DEFAULT_FLOOR_GAP: i32 = 2;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum RunMode {
    /// Nothing below the rock; the first grain to fall past it ends the run.
    #[default]
    OpenAbyss,
    /// Infinite floor below the rock; the run ends when sand blocks the source.
    FloorBounded,
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenAbyss => write!(f, "open abyss"),
            Self::FloorBounded => write!(f, "floor bounded"),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SimConfig {
    pub source: Coord,
    pub mode: RunMode,
    pub floor_gap: i32,
    /// Abyss threshold used instead of the lowest rock row. Lets an empty
    /// cave run in open-abyss mode.
    pub escape_row: Option<i32>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE,
            mode: RunMode::default(),
            floor_gap: DEFAULT_FLOOR_GAP,
            escape_row: None,
        }
    }
}

impl SimConfig {
    #[must_use]
    pub fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: Coord) -> Self {
        self.source = source;
        self
    }

    #[must_use]
    pub fn with_floor_gap(mut self, gap: i32) -> Self {
        self.floor_gap = gap;
        self
    }

    #[must_use]
    pub fn with_escape_row(mut self, row: i32) -> Self {
        self.escape_row = Some(row);
        self
    }

    fn boundary(&self, grid: &Grid) -> Result<Boundary, CaveError> {
        match self.mode {
            RunMode::FloorBounded => {
                let lowest = grid.lowest_rock_row()?;
                let floor = lowest
                    .checked_add(self.floor_gap)
                    .ok_or(CaveError::RowOutOfRange {
                        row: lowest,
                        offset: self.floor_gap,
                    })?;
                if floor <= self.source.y {
                    return Err(CaveError::SourceOutOfBounds {
                        origin: self.source,
                        limit: floor,
                    });
                }
                Ok(Boundary::Floor(floor))
            }
            RunMode::OpenAbyss => {
                let row = match self.escape_row {
                    Some(row) => row,
                    None => grid.lowest_rock_row()?,
                };
                // Escaping means reaching the row below, which must exist.
                if row == i32::MAX {
                    return Err(CaveError::RowOutOfRange { row, offset: 1 });
                }
                if self.source.y > row {
                    return Err(CaveError::SourceOutOfBounds {
                        origin: self.source,
                        limit: row,
                    });
                }
                Ok(Boundary::Abyss(row))
            }
        }
    }
}

/// Why a run stopped.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Halt {
    /// A grain fell past the abyss row; it was last seen here.
    Escaped(Coord),
    /// The source is occupied.
    SourceBlocked,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Outcome {
    pub settled: u32,
    pub halt: Halt,
}

/// Owns the cave for the duration of a run.
#[derive(Debug)]
pub struct Simulator {
    grid: Grid,
    config: SimConfig,
    boundary: Boundary,
    settled: u32,
}

impl Simulator {
    /// # Errors
    ///
    /// `EmptyMap` if the mode needs a rock row and the cave has none;
    /// `SourceOutOfBounds` if the source lies on or below the floor, or
    /// below the abyss row; `RowOutOfRange` if the floor or the row past the
    /// abyss is not a valid `i32` row.
    pub fn new(grid: Grid, config: SimConfig) -> Result<Self, CaveError> {
        let boundary = config.boundary(&grid)?;
        log::debug!(
            "simulating {} from {} with {:?}",
            config.mode,
            config.source,
            boundary
        );
        Ok(Self {
            grid,
            config,
            boundary,
            settled: 0,
        })
    }

    /// Drop one grain and let it fall to completion.
    ///
    /// Returns `Blocked` without dropping anything if the source is taken.
    /// A settled grain is written into the grid as Sand.
    pub fn drop_grain(&mut self) -> GrainState {
        self.pour().map_or(GrainState::Blocked, |grain| grain.state())
    }

    fn pour(&mut self) -> Option<Grain> {
        let source = self.config.source;
        if !self.grid.is_free(source) {
            return None;
        }
        let mut grain = Grain::new(source);
        if grain.fall(&self.grid, self.boundary) == GrainState::Settled {
            self.grid.set(grain.pos(), Cell::Sand);
            self.settled += 1;
        }
        Some(grain)
    }

    /// Drop grains until one escapes or the source is blocked.
    pub fn run(&mut self) -> Outcome {
        let halt = loop {
            match self.pour() {
                None => break Halt::SourceBlocked,
                Some(grain) if grain.state() == GrainState::Escaped => {
                    break Halt::Escaped(grain.pos());
                }
                Some(_) => {}
            }
        };
        let outcome = Outcome {
            settled: self.settled,
            halt,
        };
        log::info!(
            "{} run finished: {} grains settled, {:?}",
            self.config.mode,
            outcome.settled,
            outcome.halt
        );
        outcome
    }

    #[must_use]
    pub fn settled(&self) -> u32 {
        self.settled
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn into_grid(self) -> Grid {
        self.grid
    }

    #[must_use]
    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    #[must_use]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }
}

/// Parse `paths`, build the cave and run it to completion with the default
/// source and floor gap.
///
/// # Errors
///
/// Parse and geometry errors from [`Grid::parse`], setup errors from
/// [`Simulator::new`].
pub fn simulate(paths: &str, mode: RunMode) -> Result<Outcome, CaveError> {
    let grid = Grid::parse(paths)?;
    let mut sim = Simulator::new(grid, SimConfig::default().with_mode(mode))?;
    Ok(sim.run())
}
