//! 2D toroidal lattice with 8-connected neighbourhood (cardinal + diagonal).

use crate::error::SpaceError;
use furrow_core::{Grid, GridShape};
use smallvec::SmallVec;

/// All 8 offsets: N, S, W, E, NW, NE, SW, SE.
const OFFSETS_8: [(i64, i64); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// Resolve an axis coordinate under periodic boundaries.
fn wrap_axis(val: i64, len: u32) -> u32 {
    val.rem_euclid(i64::from(len)) as u32
}

/// A two-dimensional lattice whose edges wrap around (torus topology).
///
/// Every cell has exactly eight neighbours, including on the border, so
/// neighbour averaging never goes out of bounds. On very small lattices
/// (fewer than three rows or columns) some neighbour slots resolve to the
/// same cell, or to the cell itself; each slot still counts once.
///
/// The flat neighbour table is computed once at construction. For every
/// offset, the map from a cell to its neighbour is a bijection, which is
/// what makes [`diffuse`](Torus8::diffuse) conserve total mass.
#[derive(Debug, Clone)]
pub struct Torus8 {
    shape: GridShape,
    neighbours: Vec<[usize; 8]>,
}

impl Torus8 {
    /// Maximum size of either dimension.
    pub const MAX_DIM: u32 = i32::MAX as u32;

    /// Create a lattice with `rows * cols` cells.
    ///
    /// Returns `Err(SpaceError::EmptySpace)` if either dimension is 0, or
    /// `Err(SpaceError::DimensionTooLarge)` if either exceeds [`Self::MAX_DIM`].
    pub fn new(rows: u32, cols: u32) -> Result<Self, SpaceError> {
        if rows == 0 || cols == 0 {
            return Err(SpaceError::EmptySpace);
        }
        if rows > Self::MAX_DIM {
            return Err(SpaceError::DimensionTooLarge {
                name: "rows",
                value: rows,
                max: Self::MAX_DIM,
            });
        }
        if cols > Self::MAX_DIM {
            return Err(SpaceError::DimensionTooLarge {
                name: "cols",
                value: cols,
                max: Self::MAX_DIM,
            });
        }
        let shape = GridShape::new(rows, cols);
        let mut neighbours = Vec::with_capacity(shape.cell_count());
        for r in 0..rows {
            for c in 0..cols {
                let mut slots = [0usize; 8];
                for (slot, (dr, dc)) in slots.iter_mut().zip(OFFSETS_8) {
                    let nr = wrap_axis(i64::from(r) + dr, rows);
                    let nc = wrap_axis(i64::from(c) + dc, cols);
                    *slot = nr as usize * cols as usize + nc as usize;
                }
                neighbours.push(slots);
            }
        }
        Ok(Self { shape, neighbours })
    }

    /// The lattice dimensions.
    pub fn shape(&self) -> GridShape {
        self.shape
    }

    /// Number of cells.
    pub fn cell_count(&self) -> usize {
        self.neighbours.len()
    }

    /// Flat indices of the 8 neighbours of flat cell `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= cell_count()`.
    pub fn neighbours(&self, index: usize) -> &[usize; 8] {
        &self.neighbours[index]
    }

    /// The 8 neighbours of `(row, col)` as coordinates, or `None` if the
    /// cell is outside the lattice.
    pub fn neighbours_rc(&self, row: u32, col: u32) -> Option<SmallVec<[(u32, u32); 8]>> {
        let i = self.shape.index(row, col).ok()?;
        Some(
            self.neighbours[i]
                .iter()
                .map(|&n| self.shape.coords(n))
                .collect(),
        )
    }

    /// Mean of the 8 neighbour values of every cell.
    ///
    /// # Panics
    ///
    /// Panics if `values` does not have this lattice's shape.
    pub fn neighbour_mean(&self, values: &Grid<f64>) -> Grid<f64> {
        self.check_shape(values.shape());
        let prev = values.as_slice();
        let data = self
            .neighbours
            .iter()
            .map(|nbs| nbs.iter().map(|&n| prev[n]).sum::<f64>() / 8.0)
            .collect();
        Grid::from_vec(self.shape, data).unwrap_or_else(|| values.clone())
    }

    /// Per-cell diffusion increment `coef * (mean8 - v)`.
    ///
    /// The increments sum to zero (up to rounding) over the whole lattice.
    ///
    /// # Panics
    ///
    /// Panics if `values` does not have this lattice's shape.
    pub fn diffusion_delta(&self, values: &Grid<f64>, coef: f64) -> Grid<f64> {
        let mut delta = self.neighbour_mean(values);
        for (d, &v) in delta.iter_mut().zip(values.iter()) {
            *d = coef * (*d - v);
        }
        delta
    }

    /// One explicit diffusion pass: every cell relaxes toward the mean of
    /// its 8 neighbours by `coef`.
    ///
    /// ```text
    /// out[i] = v[i] + coef * (mean(v[neighbours(i)]) - v[i])
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `values` does not have this lattice's shape.
    pub fn diffuse(&self, values: &Grid<f64>, coef: f64) -> Grid<f64> {
        let mut out = self.diffusion_delta(values, coef);
        for (o, &v) in out.iter_mut().zip(values.iter()) {
            *o += v;
        }
        out
    }

    /// Sum of `weights` over the 8 neighbours of every cell.
    ///
    /// With 0/1 weights this is the count of flagged neighbours.
    ///
    /// # Panics
    ///
    /// Panics if `weights` does not have this lattice's shape.
    pub fn neighbour_sum(&self, weights: &Grid<f64>) -> Grid<f64> {
        self.check_shape(weights.shape());
        let w = weights.as_slice();
        let data = self
            .neighbours
            .iter()
            .map(|nbs| nbs.iter().map(|&n| w[n]).sum::<f64>())
            .collect();
        Grid::from_vec(self.shape, data).unwrap_or_else(|| weights.clone())
    }

    fn check_shape(&self, other: GridShape) {
        assert_eq!(
            other, self.shape,
            "grid shape does not match lattice shape"
        );
    }
}
