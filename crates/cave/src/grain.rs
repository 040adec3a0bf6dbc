//! A single falling grain of sand and its movement rule.

use crate::cell::Coord;
use crate::Grid;

/// Horizontal offsets tried on the row below, in priority order:
/// straight down, down-left, down-right. Do not reorder.
pub const FALL_ORDER: [i32; 3] = [0, -1, 1];

/// What stops a grain from falling forever.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Boundary {
    /// Solid, unmaterialized floor at this row. Grains rest on the row above.
    Floor(i32),
    /// A grain that moves below this row can never come to rest.
    Abyss(i32),
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum GrainState {
    Falling,
    Settled,
    Escaped,
    /// The source was occupied, so no grain entered the cave.
    Blocked,
}

/// Transient particle, alive for one drop.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Grain {
    pos: Coord,
    state: GrainState,
}

impl Grain {
    #[must_use]
    pub fn new(source: Coord) -> Self {
        Self {
            pos: source,
            state: GrainState::Falling,
        }
    }

    #[must_use]
    pub fn pos(&self) -> Coord {
        self.pos
    }

    #[must_use]
    pub fn state(&self) -> GrainState {
        self.state
    }

    /// Advance one row if possible. Grains that are no longer falling are
    /// left as they are.
    pub fn step(&mut self, grid: &Grid, boundary: Boundary) -> GrainState {
        if self.state != GrainState::Falling {
            return self.state;
        }
        // The last representable row is solid: nothing lies below it.
        let Some(below) = self.pos.checked_offset(0, 1) else {
            self.state = GrainState::Settled;
            return self.state;
        };
        if boundary == Boundary::Floor(below.y) {
            self.state = GrainState::Settled;
            return self.state;
        }

        let next = FALL_ORDER
            .iter()
            .filter_map(|&dx| below.checked_offset(dx, 0))
            .find(|&c| grid.is_free(c));
        match next {
            Some(c) => {
                self.pos = c;
                if let Boundary::Abyss(row) = boundary {
                    if c.y > row {
                        self.state = GrainState::Escaped;
                    }
                }
            }
            None => self.state = GrainState::Settled,
        }
        self.state
    }

    /// Step until the grain settles or escapes.
    pub fn fall(&mut self, grid: &Grid, boundary: Boundary) -> GrainState {
        while self.step(grid, boundary) == GrainState::Falling {}
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;
    use proptest::prelude::*;

    const SOURCE: Coord = Coord::new(500, 0);

    fn grid_with(rocks: &[(i32, i32)]) -> Grid {
        let mut grid = Grid::new();
        for &(x, y) in rocks {
            grid.set(Coord::new(x, y), Cell::Rock);
        }
        grid
    }

    #[test]
    fn falls_straight_down_first() {
        let grid = grid_with(&[(500, 5)]);
        let mut grain = Grain::new(SOURCE);
        assert_eq!(grain.step(&grid, Boundary::Abyss(5)), GrainState::Falling);
        assert_eq!(grain.pos(), Coord::new(500, 1));
    }

    #[test]
    fn prefers_down_left_over_down_right() {
        let grid = grid_with(&[(500, 1)]);
        let mut grain = Grain::new(SOURCE);
        grain.step(&grid, Boundary::Abyss(10));
        assert_eq!(grain.pos(), Coord::new(499, 1));
    }

    #[test]
    fn takes_down_right_when_left_blocked() {
        let grid = grid_with(&[(500, 1), (499, 1)]);
        let mut grain = Grain::new(SOURCE);
        grain.step(&grid, Boundary::Abyss(10));
        assert_eq!(grain.pos(), Coord::new(501, 1));
    }

    #[test]
    fn settles_when_all_three_blocked() {
        let grid = grid_with(&[(499, 1), (500, 1), (501, 1)]);
        let mut grain = Grain::new(SOURCE);
        assert_eq!(grain.step(&grid, Boundary::Abyss(1)), GrainState::Settled);
        assert_eq!(grain.pos(), SOURCE);
        assert_eq!(grain.state(), GrainState::Settled);
    }

    #[test]
    fn rests_on_floor_without_touching_grid() {
        let grid = Grid::new();
        let mut grain = Grain::new(SOURCE);
        assert_eq!(grain.fall(&grid, Boundary::Floor(4)), GrainState::Settled);
        assert_eq!(grain.pos(), Coord::new(500, 3));
        assert!(grid.is_free(Coord::new(500, 4)));
    }

    #[test]
    fn escapes_once_below_abyss_row() {
        let grid = grid_with(&[(400, 3)]);
        let mut grain = Grain::new(SOURCE);
        assert_eq!(grain.fall(&grid, Boundary::Abyss(3)), GrainState::Escaped);
        assert_eq!(grain.pos(), Coord::new(500, 4));
    }

    #[test]
    fn finished_grain_does_not_move() {
        let grid = Grid::new();
        let mut grain = Grain::new(SOURCE);
        grain.fall(&grid, Boundary::Floor(2));
        let pos = grain.pos();
        assert_eq!(grain.step(&grid, Boundary::Floor(100)), GrainState::Settled);
        assert_eq!(grain.pos(), pos);
    }

    #[test]
    fn bottom_of_coordinate_range_is_solid() {
        let grid = Grid::new();
        let mut grain = Grain::new(Coord::new(0, i32::MAX - 1));
        assert_eq!(grain.step(&grid, Boundary::Abyss(i32::MAX)), GrainState::Falling);
        assert_eq!(grain.pos(), Coord::new(0, i32::MAX));
        assert_eq!(grain.step(&grid, Boundary::Abyss(i32::MAX)), GrainState::Settled);
        assert_eq!(grain.pos(), Coord::new(0, i32::MAX));
    }

    #[test]
    fn side_of_coordinate_range_is_solid() {
        let grid = grid_with(&[(i32::MIN, 1)]);
        let mut grain = Grain::new(Coord::new(i32::MIN, 0));
        grain.step(&grid, Boundary::Floor(10));
        assert_eq!(grain.pos(), Coord::new(i32::MIN + 1, 1));
    }

    proptest! {
        #[test]
        fn prop_each_step_moves_one_row_down(
            rocks in proptest::collection::vec((495i32..506, 1i32..8), 0..30),
        ) {
            let grid = grid_with(&rocks);
            let mut grain = Grain::new(SOURCE);
            loop {
                let before = grain.pos();
                let state = grain.step(&grid, Boundary::Floor(9));
                if state != GrainState::Falling {
                    prop_assert_eq!(state, GrainState::Settled);
                    prop_assert!(grid.is_free(grain.pos()));
                    break;
                }
                let after = grain.pos();
                prop_assert_eq!(after.y, before.y + 1);
                prop_assert!((after.x - before.x).abs() <= 1);
                prop_assert!(grid.is_free(after));
            }
        }
    }
}
