//! Text snapshot of the cave for debugging. Has no effect on simulation.

use std::fmt;

use crate::cell::Coord;
use crate::Grid;

/// Rectangular dump of the box around every recorded cell, one string per
/// row: `#` rock, `o` sand, `.` air.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Snapshot {
    origin: Coord,
    rows: Vec<String>,
}

impl Snapshot {
    /// `None` for a cave with nothing recorded.
    #[must_use]
    pub fn capture(grid: &Grid) -> Option<Self> {
        Self::capture_with(grid, &[])
    }

    /// Like [`Snapshot::capture`], widened to include `extra` coordinates
    /// (typically the source).
    #[must_use]
    pub fn capture_with(grid: &Grid, extra: &[Coord]) -> Option<Self> {
        let (lo, hi) = extra.iter().fold(grid.bounds(), |acc, &c| match acc {
            None => Some((c, c)),
            Some((lo, hi)) => Some((
                Coord::new(lo.x.min(c.x), lo.y.min(c.y)),
                Coord::new(hi.x.max(c.x), hi.y.max(c.y)),
            )),
        })?;
        let rows = (lo.y..=hi.y)
            .map(|y| {
                (lo.x..=hi.x)
                    .map(|x| grid.cell(Coord::new(x, y)).symbol())
                    .collect::<String>()
            })
            .collect();
        Some(Self { origin: lo, rows })
    }

    /// Top-left corner of the snapshot.
    #[must_use]
    pub fn origin(&self) -> Coord {
        self.origin
    }

    #[must_use]
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, String::len)
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}
