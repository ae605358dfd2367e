//! Reusable grid fixtures.
//!
//! - [`uniform`]: every cell the same value.
//! - [`hotspot`]: uniform background with one different cell.
//! - [`ramp`]: values rising linearly in row-major order.
//! - [`checkerboard`]: alternating flags.

use furrow_core::{Grid, GridShape};

pub fn uniform(rows: u32, cols: u32, value: f64) -> Grid<f64> {
    Grid::filled(GridShape::new(rows, cols), value)
}

/// `background` everywhere except `peak` at `(row, col)`.
///
/// # Panics
///
/// Panics if `(row, col)` is outside the grid.
pub fn hotspot(rows: u32, cols: u32, background: f64, row: u32, col: u32, peak: f64) -> Grid<f64> {
    let mut g = uniform(rows, cols, background);
    *g.get_mut(row, col).expect("hotspot cell outside grid") = peak;
    g
}

/// Values from `low` at `(0, 0)` to `high` at the last cell.
pub fn ramp(rows: u32, cols: u32, low: f64, high: f64) -> Grid<f64> {
    let shape = GridShape::new(rows, cols);
    let last = shape.cell_count().saturating_sub(1).max(1) as f64;
    Grid::from_fn(shape, |r, c| {
        let i = (r * cols + c) as f64;
        low + (high - low) * i / last
    })
}

pub fn checkerboard(rows: u32, cols: u32) -> Grid<bool> {
    Grid::from_fn(GridShape::new(rows, cols), |r, c| (r + c) % 2 == 0)
}
