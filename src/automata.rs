//! Cellular automata smoothing pass
//!
//! Every cell looks at the square window of radius `R` around it and becomes
//! Floor when the fraction of Floor neighbors strictly exceeds the threshold.
//! The fraction is always taken over the full window size `(2R+1)^2 - 1`,
//! even where the window is clipped by the map edge, so border cells lean
//! towards Empty.

use crate::error::MapGenError;
use crate::params::AutomataParams;
use crate::tilemap::{Cell, Tilemap};

/// Number of neighbors in a full window of the given radius (center excluded).
///
/// Computed in `u64`: the largest radius gives `(2^32 - 1)^2 - 1`, which
/// still fits.
pub fn neighborhood_size(radius: i32) -> u64 {
    let side = 2 * radius.max(0) as u64 + 1;
    side * side - 1
}

/// Count Floor cells in the window around `(x, y)`, excluding the center.
/// Cells beyond the map edge are not counted, so the window is clipped to
/// the map before looping.
pub fn neighbor_count(map: &Tilemap<Cell>, x: usize, y: usize, radius: i32) -> usize {
    let (cx, cy) = (x as i64, y as i64);
    let r = radius.max(0) as i64;
    let x0 = (cx - r).max(0);
    let y0 = (cy - r).max(0);
    let x1 = (cx + r).min(map.width() as i64 - 1);
    let y1 = (cy + r).min(map.height() as i64 - 1);
    let mut count = 0;

    for ny in y0..=y1 {
        for nx in x0..=x1 {
            if nx == cx && ny == cy {
                continue;
            }
            if let Some(cell) = map.get_signed(nx, ny) {
                count += cell.value() as usize;
            }
        }
    }

    count
}

/// Apply one automata step, returning a new map of the same size.
pub fn apply_automata(
    map: &Tilemap<Cell>,
    params: &AutomataParams,
) -> Result<Tilemap<Cell>, MapGenError> {
    params.validate()?;
    Ok(smooth(map, params))
}

/// Automata step for parameters that are already validated.
///
/// Reads only from `map` and writes only into a fresh buffer, so the result
/// does not depend on visiting order.
pub(crate) fn smooth(map: &Tilemap<Cell>, params: &AutomataParams) -> Tilemap<Cell> {
    let total = neighborhood_size(params.radius) as f64;
    let mut result = map.clone();

    for y in 0..map.height() {
        for x in 0..map.width() {
            let ratio = neighbor_count(map, x, y, params.radius) as f64 / total;
            result.set_clipped(x as i64, y as i64, Cell::from(ratio > params.threshold));
        }
    }

    result
}
