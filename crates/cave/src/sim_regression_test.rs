//! Regression test: grains must try down, then down-left, then down-right.

#[cfg(test)]
mod tests {
    use crate::cell::{Cell, Coord};
    use crate::grain::{Boundary, Grain, GrainState, FALL_ORDER};
    use crate::sim::{RunMode, SimConfig, Simulator};
    use crate::Grid;

    /// Helper: drop grains one at a time and record where each one settled.
    fn settle_order(sim: &mut Simulator) -> Vec<Coord> {
        let mut order = Vec::new();
        loop {
            let before: Vec<Coord> = sim
                .grid()
                .iter()
                .filter(|&(_, cell)| cell == Cell::Sand)
                .map(|(c, _)| c)
                .collect();
            if sim.drop_grain() != GrainState::Settled {
                break;
            }
            let landed = sim
                .grid()
                .iter()
                .find(|&(c, cell)| cell == Cell::Sand && !before.contains(&c))
                .map(|(c, _)| c);
            order.push(landed.expect("settled grain is recorded"));
        }
        order
    }

    #[test]
    fn fall_order_is_down_left_right() {
        assert_eq!(FALL_ORDER, [0, -1, 1]);
    }

    /// One rock under the source with the floor two rows below it. Traced
    /// by hand: the left slope always fills before the right one.
    #[test]
    fn single_rock_fills_left_side_first() {
        let grid = Grid::parse("500,1 -> 500,1").unwrap();
        let config = SimConfig::default().with_mode(RunMode::FloorBounded);
        let mut sim = Simulator::new(grid, config).unwrap();
        assert_eq!(sim.boundary(), Boundary::Floor(3));

        let order = settle_order(&mut sim);
        assert_eq!(
            order,
            [
                Coord::new(499, 2),
                Coord::new(498, 2),
                Coord::new(500, 2),
                Coord::new(499, 1),
                Coord::new(501, 2),
                Coord::new(502, 2),
                Coord::new(501, 1),
                Coord::new(500, 0),
            ]
        );
        assert_eq!(sim.settled(), 8);
    }

    #[test]
    fn example_first_grains_stack_then_roll_left_then_right() {
        let grid = Grid::parse("498,4 -> 498,6 -> 496,6\n503,4 -> 502,4 -> 502,9 -> 494,9").unwrap();
        let mut sim = Simulator::new(grid, SimConfig::default()).unwrap();
        let order: Vec<Coord> = settle_order(&mut sim).into_iter().take(3).collect();
        assert_eq!(
            order,
            [Coord::new(500, 8), Coord::new(499, 8), Coord::new(501, 8)]
        );
    }

    #[test]
    fn blocked_left_diagonal_sends_grain_right() {
        let left = Grid::parse("500,1 -> 500,1").unwrap();
        let mut grain = Grain::new(Coord::new(500, 0));
        assert_eq!(grain.fall(&left, Boundary::Floor(3)), GrainState::Settled);
        assert_eq!(grain.pos(), Coord::new(499, 2));

        // Block the left diagonal: the grain must now go right.
        let mut blocked = left.clone();
        blocked.set(Coord::new(499, 1), Cell::Rock);
        let mut grain = Grain::new(Coord::new(500, 0));
        grain.fall(&blocked, Boundary::Floor(3));
        assert_eq!(grain.pos(), Coord::new(501, 2));
    }
}
