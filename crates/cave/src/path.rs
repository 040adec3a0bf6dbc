//! Rock path descriptions: `"x1,y1 -> x2,y2 -> ... -> xn,yn"`.

use crate::cell::Coord;
use crate::error::CaveError;

const ARROW: &str = "->";

/// Parse a single path line.
///
/// # Errors
///
/// `InvalidVertex` if a vertex is not two comma-separated integers,
/// `PathTooShort` if the line has fewer than two vertices.
pub fn parse_path(text: &str) -> Result<Vec<Coord>, CaveError> {
    parse_line(1, text)
}

/// Parse every non-blank line of `text` as a path. Line numbers in errors
/// are 1-based and count blank lines.
///
/// # Errors
///
/// The first error from [`parse_path`], tagged with its line number.
pub fn parse_paths(text: &str) -> Result<Vec<Vec<Coord>>, CaveError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| parse_line(i + 1, line))
        .collect()
}

fn parse_line(line: usize, text: &str) -> Result<Vec<Coord>, CaveError> {
    let vertices = text
        .split(ARROW)
        .map(|vertex| parse_vertex(line, vertex))
        .collect::<Result<Vec<_>, _>>()?;
    if vertices.len() < 2 {
        return Err(CaveError::PathTooShort { line });
    }
    Ok(vertices)
}

fn parse_vertex(line: usize, text: &str) -> Result<Coord, CaveError> {
    let invalid = || CaveError::InvalidVertex {
        line,
        text: text.trim().to_owned(),
    };
    let (x, y) = text.split_once(',').ok_or_else(invalid)?;
    let x = x.trim().parse().map_err(|_| invalid())?;
    let y = y.trim().parse().map_err(|_| invalid())?;
    Ok(Coord::new(x, y))
}

/// Every coordinate on the inclusive straight line from `from` to `to`,
/// starting at `from`. Identical endpoints yield one coordinate.
///
/// # Errors
///
/// `MalformedSegment` if the endpoints differ on both axes.
pub fn segment(from: Coord, to: Coord) -> Result<impl Iterator<Item = Coord>, CaveError> {
    if from.x != to.x && from.y != to.y {
        return Err(CaveError::MalformedSegment { from, to });
    }
    // Spans are measured in i64 so segments across the whole i32 range fit.
    let dx = i64::from(to.x) - i64::from(from.x);
    let dy = i64::from(to.y) - i64::from(from.y);
    let len = dx.abs().max(dy.abs());
    let (sx, sy) = (dx.signum(), dy.signum());
    Ok((0..=len).map(move |i| {
        Coord::new(
            (i64::from(from.x) + sx * i) as i32,
            (i64::from(from.y) + sy * i) as i32,
        )
    }))
}
