//! Whole-column operations over any [`FieldAccess`].
//!
//! Irrigation lines and fertilizer spreaders run along a column, and soil
//! probes are read as a column average. Each helper validates the column
//! before touching any cell, so an out-of-range column changes nothing.

use furrow_core::{FieldAccess, FieldError, SoilReading};

/// Irrigate every cell of `col` at `flow_rate` litres per hour, top to
/// bottom. Each cell's irrigation includes its own diffusion pass.
pub fn irrigate_column<F: FieldAccess + ?Sized>(
    field: &mut F,
    col: u32,
    flow_rate: f64,
) -> Result<(), FieldError> {
    let shape = field.shape();
    shape.check_col(col)?;
    FieldError::non_negative("flow_rate", flow_rate)?;
    for row in 0..shape.rows() {
        field.apply_irrigation(row, col, flow_rate)?;
    }
    Ok(())
}

/// Spread `amount_kg` of fertilizer on every cell of `col`.
pub fn fertilize_column<F: FieldAccess + ?Sized>(
    field: &mut F,
    col: u32,
    amount_kg: f64,
) -> Result<(), FieldError> {
    let shape = field.shape();
    shape.check_col(col)?;
    FieldError::non_negative("amount_kg", amount_kg)?;
    for row in 0..shape.rows() {
        field.apply_fertilize(row, col, amount_kg)?;
    }
    Ok(())
}

/// Mean soil reading over every cell of `col`.
pub fn column_soil_average<F: FieldAccess + ?Sized>(
    field: &F,
    col: u32,
) -> Result<SoilReading, FieldError> {
    let shape = field.shape();
    shape.check_col(col)?;
    let mut sum = SoilReading::default();
    for row in 0..shape.rows() {
        let r = field.get_soil(row, col)?;
        sum.temperature += r.temperature;
        sum.nutrients += r.nutrients;
        sum.moisture += r.moisture;
    }
    let n = f64::from(shape.rows());
    Ok(SoilReading {
        temperature: sum.temperature / n,
        nutrients: sum.nutrients / n,
        moisture: sum.moisture / n,
    })
}
