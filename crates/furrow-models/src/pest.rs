//! Pest infestation spreading over the toroidal lattice.
//!
//! Infection is absorbing: an infested cell stays infested until it is
//! sprayed or the whole grid is cleared. An uninfested cell with infection
//! pressure `n` becomes infested with probability `1 - (1 - p_spread)^n`.
//!
//! Pressure is the sum of the spread weights of the infested neighbours.
//! Every cell starts with weight 1, so the pressure is the neighbour count.
//! Spraying a cell lowers its weight, which damps what it passes on to its
//! neighbours if it is ever re-infested.

use furrow_core::{FieldError, Grid, GridShape};
use furrow_space::Torus8;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ParamError;

/// Pest spread parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PestParams {
    /// Chance that one infested neighbour (at full weight) infests a cell
    /// in one tick.
    pub p_spread: f64,
}

impl Default for PestParams {
    fn default() -> Self {
        Self { p_spread: 0.1 }
    }
}

impl PestParams {
    /// Check every parameter.
    pub fn validate(&self) -> Result<(), ParamError> {
        ParamError::probability("pest.p_spread", self.p_spread)
    }
}

/// Infestation grid and per-cell spread weights.
#[derive(Clone, Debug, PartialEq)]
pub struct PestModel {
    infested: Grid<bool>,
    weights: Grid<f64>,
    params: PestParams,
}

impl PestModel {
    /// A clean grid with every spread weight at 1.
    pub fn new(shape: GridShape, params: PestParams) -> Self {
        Self {
            infested: Grid::filled(shape, false),
            weights: Grid::filled(shape, 1.0),
            params,
        }
    }

    /// The infestation grid.
    pub fn infested(&self) -> &Grid<bool> {
        &self.infested
    }

    /// Spread weight of every cell.
    pub fn weights(&self) -> &Grid<f64> {
        &self.weights
    }

    /// The model parameters.
    pub fn params(&self) -> &PestParams {
        &self.params
    }

    /// Number of infested cells.
    pub fn infested_count(&self) -> usize {
        self.infested.count_true()
    }

    /// Compute the infestation grid after one spread pass.
    ///
    /// Draws one uniform number per uninfested cell, in row-major order.
    ///
    /// # Panics
    ///
    /// Panics if `torus` does not match this model's shape.
    pub fn spread<R: Rng + ?Sized>(&self, torus: &Torus8, rng: &mut R) -> Grid<bool> {
        let mut sources = self.weights.clone();
        for (w, &inf) in sources.iter_mut().zip(self.infested.iter()) {
            if !inf {
                *w = 0.0;
            }
        }
        let pressure = torus.neighbour_sum(&sources);
        let escape = 1.0 - self.params.p_spread;

        let mut next = self.infested.clone();
        for (cell, &n) in next.iter_mut().zip(pressure.iter()) {
            if *cell {
                continue;
            }
            let p = 1.0 - escape.powf(n);
            if rng.random::<f64>() < p {
                *cell = true;
            }
        }
        next
    }

    /// Replace the infestation grid.
    ///
    /// # Panics
    ///
    /// Panics if `infested` has a different shape.
    pub fn set_infested(&mut self, infested: Grid<bool>) {
        assert_eq!(infested.shape(), self.infested.shape(), "pest grid shape mismatch");
        self.infested = infested;
    }

    /// Run one spread pass in place and return the number of infested
    /// cells afterwards.
    pub fn update<R: Rng + ?Sized>(&mut self, torus: &Torus8, rng: &mut R) -> usize {
        self.infested = self.spread(torus, rng);
        self.infested_count()
    }

    /// Infest `(row, col)`.
    pub fn infest(&mut self, row: u32, col: u32) -> Result<(), FieldError> {
        *self.infested.get_mut(row, col)? = true;
        Ok(())
    }

    /// Infest one cell chosen uniformly at random and return it.
    pub fn infest_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> (u32, u32) {
        let shape = self.infested.shape();
        let i = rng.random_range(0..self.infested.len());
        self.infested[i] = true;
        shape.coords(i)
    }

    /// Clear every infestation and restore every spread weight to 1.
    pub fn clear(&mut self) {
        self.infested.fill(false);
        self.weights.fill(1.0);
    }

    /// Spray `(row, col)`: clear it and set its spread weight to
    /// `1 - neighbor_effect`. Neighbours are not cured.
    ///
    /// On error nothing is changed.
    pub fn apply_pesticide(&mut self, row: u32, col: u32, neighbor_effect: f64) -> Result<(), FieldError> {
        let i = self.infested.shape().index(row, col)?;
        let effect = FieldError::unit_interval("neighbor_effect", neighbor_effect)?;
        self.infested[i] = false;
        self.weights[i] = self.weights[i].min(1.0 - effect);
        Ok(())
    }
}
