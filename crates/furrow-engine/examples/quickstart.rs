//! Furrow Quickstart: a small field through one simulated week.
//!
//! Demonstrates:
//!   1. Building a FieldConfig (with a JSON override) and a Field
//!   2. Planting, irrigating, and fertilizing through the actuation API
//!   3. Forcing weather and pest events
//!   4. Stepping and reading sensors and per-tick metrics
//!   5. Harvesting
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example quickstart

use furrow_engine::sensing::{column_soil_average, fertilize_column, irrigate_column};
use furrow_engine::{Field, FieldConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

// ─── Grid parameters ────────────────────────────────────────────

const ROWS: u32 = 6;
const COLS: u32 = 6;
const DAYS: u32 = 7;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    let config = FieldConfig::from_json_str(&format!(
        r#"{{ "rows": {ROWS}, "cols": {COLS}, "seed": 2024, "pest": {{ "p_spread": 0.05 }} }}"#
    ))?;
    let mut field = Field::new(config)?;

    // ─── Sow one species per column ────────────────────────────
    for col in 0..COLS {
        for row in 0..ROWS {
            field.plant_seed(row, col, col as u8)?;
        }
    }

    field.apply_rain(1)?;
    field.apply_pest();

    for hour in 0..DAYS * 24 {
        let metrics = field.step();

        // Morning round: water and feed the driest column.
        if field.hour() == 6 {
            let driest = (0..COLS)
                .map(|c| column_soil_average(&field, c).map(|s| (c, s.moisture)))
                .collect::<Result<Vec<_>, _>>()?
                .into_iter()
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(c, _)| c)
                .unwrap_or(0);
            irrigate_column(&mut field, driest, 20.0)?;
            fertilize_column(&mut field, driest, 0.2)?;
        }

        if hour % 24 == 23 {
            let soil = column_soil_average(&field, 0)?;
            info!(
                day = field.day(),
                temperature = field.temperature(),
                rain = ?field.rain().level(),
                moisture = format!("{:.1}", soil.moisture),
                nutrients = format!("{:.1}", soil.nutrients),
                planted = field.crop().planted_count(),
                infested = metrics.infested_cells,
                step_us = metrics.total_us,
                "end of day"
            );
        }

        // Spray anything the drone sees.
        if metrics.infested_cells > 0 && field.hour() == 18 {
            for row in 0..ROWS {
                for col in 0..COLS {
                    if field.get_drone(row, col)?.pest {
                        field.apply_pesticide(row, col)?;
                    }
                }
            }
        }
    }

    let mut total = 0.0;
    for row in 0..ROWS {
        for col in 0..COLS {
            total += field.harvest(row, col)?;
        }
    }
    info!(
        mean_yield = total / f64::from(ROWS * COLS),
        "harvest complete"
    );
    Ok(())
}
