//! Cell addressing and the row-major per-cell [`Grid`] container.

use std::ops::{Index, IndexMut};

use crate::error::FieldError;

/// Fixed `rows x cols` dimensions shared by every per-cell array of a field.
///
/// Cells are addressed by `(row, col)` and stored row-major, so the flat
/// index of `(r, c)` is `r * cols + c`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridShape {
    rows: u32,
    cols: u32,
}

impl GridShape {
    /// Create a shape with the given dimensions.
    pub const fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }

    /// Number of rows.
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns.
    pub const fn cols(&self) -> u32 {
        self.cols
    }

    /// Total number of cells.
    pub const fn cell_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// Whether `(row, col)` addresses a cell of this shape.
    pub const fn contains(&self, row: u32, col: u32) -> bool {
        row < self.rows && col < self.cols
    }

    /// Flat row-major index of `(row, col)`.
    ///
    /// Returns [`FieldError::OutOfBounds`] instead of wrapping.
    pub fn index(&self, row: u32, col: u32) -> Result<usize, FieldError> {
        if self.contains(row, col) {
            Ok(row as usize * self.cols as usize + col as usize)
        } else {
            Err(FieldError::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    /// Check that `col` addresses a column of this shape.
    pub fn check_col(&self, col: u32) -> Result<(), FieldError> {
        // Row 0 always exists for a non-empty shape; reuse the cell check.
        self.index(0, col).map(|_| ())
    }

    /// Inverse of [`index`](Self::index): `(row, col)` for a flat index.
    pub fn coords(&self, index: usize) -> (u32, u32) {
        let cols = self.cols as usize;
        ((index / cols) as u32, (index % cols) as u32)
    }
}

/// A dense row-major array holding one value per cell.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    shape: GridShape,
    data: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// A grid with every cell set to `value`.
    pub fn filled(shape: GridShape, value: T) -> Self {
        Self {
            shape,
            data: vec![value; shape.cell_count()],
        }
    }

    /// Set every cell to `value`.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }
}

impl<T> Grid<T> {
    /// Build a grid by evaluating `f(row, col)` for every cell in row-major order.
    pub fn from_fn(shape: GridShape, mut f: impl FnMut(u32, u32) -> T) -> Self {
        let mut data = Vec::with_capacity(shape.cell_count());
        for r in 0..shape.rows() {
            for c in 0..shape.cols() {
                data.push(f(r, c));
            }
        }
        Self { shape, data }
    }

    /// Wrap an existing row-major buffer.
    ///
    /// Returns `None` if `data.len()` does not match the shape's cell count.
    pub fn from_vec(shape: GridShape, data: Vec<T>) -> Option<Self> {
        (data.len() == shape.cell_count()).then_some(Self { shape, data })
    }

    /// The grid's dimensions.
    pub fn shape(&self) -> GridShape {
        self.shape
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bounds-checked reference to the value at `(row, col)`.
    pub fn get(&self, row: u32, col: u32) -> Result<&T, FieldError> {
        let i = self.shape.index(row, col)?;
        Ok(&self.data[i])
    }

    /// Bounds-checked mutable reference to the value at `(row, col)`.
    pub fn get_mut(&mut self, row: u32, col: u32) -> Result<&mut T, FieldError> {
        let i = self.shape.index(row, col)?;
        Ok(&mut self.data[i])
    }

    /// The flat row-major buffer.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// The flat row-major buffer, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Iterate over cells in row-major order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Iterate mutably over cells in row-major order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.data.iter_mut()
    }

    /// A new grid of the same shape holding `f(value)` for each cell.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            shape: self.shape,
            data: self.data.iter().map(f).collect(),
        }
    }

    /// Iterate over the cells of column `col`, top to bottom.
    pub fn column(&self, col: u32) -> Result<impl Iterator<Item = &T> + '_, FieldError> {
        self.shape.check_col(col)?;
        let cols = self.shape.cols() as usize;
        Ok(self.data.iter().skip(col as usize).step_by(cols))
    }

    /// Consume the grid, returning its row-major buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl Grid<f64> {
    /// Sum over all cells.
    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    /// Arithmetic mean over all cells, or 0 for an empty grid.
    pub fn mean(&self) -> f64 {
        if self.data.is_empty() {
            0.0
        } else {
            self.sum() / self.data.len() as f64
        }
    }

    /// Clamp every cell into `[lo, hi]`.
    pub fn clamp_all(&mut self, lo: f64, hi: f64) {
        for v in &mut self.data {
            *v = v.clamp(lo, hi);
        }
    }
}

impl Grid<bool> {
    /// Number of cells set to `true`.
    pub fn count_true(&self) -> usize {
        self.data.iter().filter(|&&b| b).count()
    }
}

impl<T> Index<usize> for Grid<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.data[index]
    }
}

impl<T> IndexMut<usize> for Grid<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.data[index]
    }
}

impl<'a, T> IntoIterator for &'a Grid<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn index_is_row_major() {
        let s = GridShape::new(3, 4);
        assert_eq!(s.index(0, 0), Ok(0));
        assert_eq!(s.index(0, 3), Ok(3));
        assert_eq!(s.index(1, 0), Ok(4));
        assert_eq!(s.index(2, 3), Ok(11));
    }

    #[test]
    fn index_rejects_out_of_bounds_without_wrapping() {
        let s = GridShape::new(3, 4);
        assert_eq!(
            s.index(3, 0),
            Err(FieldError::OutOfBounds {
                row: 3,
                col: 0,
                rows: 3,
                cols: 4
            })
        );
        assert!(s.index(0, 4).is_err());
        assert!(s.check_col(4).is_err());
        assert!(s.check_col(3).is_ok());
    }

    #[test]
    fn column_walks_top_to_bottom() {
        let g = Grid::from_fn(GridShape::new(3, 2), |r, c| r * 10 + c);
        let col: Vec<u32> = g.column(1).unwrap().copied().collect();
        assert_eq!(col, vec![1, 11, 21]);
        assert!(g.column(2).is_err());
    }

    #[test]
    fn from_vec_checks_length() {
        let s = GridShape::new(2, 2);
        assert!(Grid::from_vec(s, vec![0.0; 4]).is_some());
        assert!(Grid::from_vec(s, vec![0.0; 5]).is_none());
    }

    #[test]
    fn get_mut_writes_single_cell() {
        let mut g = Grid::filled(GridShape::new(2, 2), 0.0);
        *g.get_mut(1, 0).unwrap() = 5.0;
        assert_eq!(g.as_slice(), &[0.0, 0.0, 5.0, 0.0]);
        assert_eq!(g.sum(), 5.0);
        assert_eq!(g.mean(), 1.25);
    }

    #[test]
    fn clamp_all_bounds_values() {
        let mut g = Grid::from_vec(GridShape::new(1, 3), vec![-4.0, 50.0, 140.0]).unwrap();
        g.clamp_all(0.0, 100.0);
        assert_eq!(g.as_slice(), &[0.0, 50.0, 100.0]);
    }

    proptest! {
        #[test]
        fn coords_inverts_index(rows in 1u32..40, cols in 1u32..40, r in 0u32..40, c in 0u32..40) {
            let s = GridShape::new(rows, cols);
            prop_assume!(r < rows && c < cols);
            let i = s.index(r, c).unwrap();
            prop_assert!(i < s.cell_count());
            prop_assert_eq!(s.coords(i), (r, c));
        }
    }
}
