//! Integration test: end-to-end field scenarios.
//!
//! Each scenario pins the weather so one mechanism can be observed
//! through the public `Field` API.

use furrow_core::{CropStage, RainLevel};
use furrow_engine::{Field, FieldConfig};
use furrow_models::{MoistureParams, RainParams, TemperatureParams};

/// Constant temperature and no rain, ever.
fn still_weather(rows: u32, cols: u32, temperature: f64) -> FieldConfig {
    FieldConfig {
        seed: 11,
        temperature: TemperatureParams {
            annual_mean: temperature,
            annual_amplitude: 0.0,
            daily_min_offset: 0.0,
            daily_max_offset: 0.0,
            noise_std: 0.0,
            ..TemperatureParams::default()
        },
        rain: RainParams {
            season_probs: [[1.0, 0.0, 0.0, 0.0]; 4],
            extreme_override_prob: 0.0,
            ..RainParams::default()
        },
        ..FieldConfig::with_size(rows, cols)
    }
}

// ── Growth ──────────────────────────────────────────────────────────

#[test]
fn unstressed_type_zero_germinates_exactly_on_schedule() {
    let mut cfg = still_weather(3, 3, 22.0);
    cfg.moisture = MoistureParams {
        evap_base_coeff: 0.0,
        ..MoistureParams::default()
    };
    let stage1_hours = cfg.plants.stage_hours[0][0] as usize;
    let mut field = Field::new(cfg).unwrap();
    field.plant_seed(0, 0, 0).unwrap();

    for tick in 1..stage1_hours {
        field.step();
        assert_eq!(
            field.get_drone(0, 0).unwrap().stage,
            CropStage::Seed,
            "advanced early at tick {tick}"
        );
    }
    let metrics = field.step();
    assert_eq!(field.get_drone(0, 0).unwrap().stage, CropStage::Germinate);
    assert_eq!(metrics.stage_transitions, 1);
    assert_eq!(*field.crop().health().get(0, 0).unwrap(), 100.0);
}

#[test]
fn crops_in_freezing_weather_decline() {
    let mut field = Field::new(still_weather(2, 2, -5.0)).unwrap();
    field.plant_seed(1, 1, 2).unwrap();
    for _ in 0..24 {
        field.step();
    }
    let health = *field.crop().health().get(1, 1).unwrap();
    assert!(health < 100.0, "health {health}");
    // Growth stalls at full stress.
    assert_eq!(field.get_drone(1, 1).unwrap().stage, CropStage::Seed);
}

#[test]
fn neglected_crop_eventually_dies_and_empties() {
    let mut field = Field::new(still_weather(2, 2, -5.0)).unwrap();
    field.plant_seed(0, 1, 1).unwrap();
    let mut deaths = 0;
    for _ in 0..200 {
        deaths += field.step().crop_deaths;
    }
    assert_eq!(deaths, 1);
    let drone = field.get_drone(0, 1).unwrap();
    assert_eq!(drone.stage, CropStage::Empty);
    assert_eq!(drone.plant, None);
}

// ── Weather ─────────────────────────────────────────────────────────

#[test]
fn drought_rain_over_a_year_stays_valid() {
    let mut field = Field::new(FieldConfig {
        seed: 1234,
        tick_hours: 9,
        ..FieldConfig::with_size(4, 4)
    })
    .unwrap();
    assert!(field.toggle_drought());
    let mut seen_days = std::collections::BTreeSet::new();
    for _ in 0..1000 {
        field.step();
        assert!(RainLevel::ALL.contains(&field.rain().level()));
        assert!(field.rain().remaining_hours() >= 0.0);
        seen_days.insert(field.day());
    }
    // 1000 ticks of 9 h cover every season.
    assert!(seen_days.len() >= 365);
}

#[test]
fn diffusion_alone_conserves_moisture() {
    let mut cfg = still_weather(5, 6, 0.0);
    cfg.moisture.initial = [40.0, 50.0, 60.0];
    let mut field = Field::new(cfg).unwrap();
    let before = field.moisture().sum();
    field.step();
    let after = field.moisture().sum();
    assert!((before - after).abs() < 1e-9, "{before} vs {after}");
}

#[test]
fn forced_heavy_rain_wets_the_field() {
    let mut cfg = still_weather(3, 3, 3.0);
    cfg.rain.p_stop_early_per_hour = 0.0;
    cfg.rain.min_duration_hours = 5.0;
    let mut field = Field::new(cfg).unwrap();
    let before = field.moisture().mean();
    field.apply_rain(3).unwrap();
    field.step();
    assert!(field.moisture().mean() > before);
}

// ── Pests ───────────────────────────────────────────────────────────

#[test]
fn pests_spread_until_removed() {
    let mut cfg = still_weather(6, 6, 20.0);
    cfg.pest.p_spread = 0.5;
    let mut field = Field::new(cfg).unwrap();
    field.apply_pest();
    let mut last = 1;
    for _ in 0..20 {
        let n = field.step().infested_cells;
        assert!(n >= last);
        last = n;
    }
    assert!(last > 1);
    field.remove_pest();
    assert_eq!(field.step().infested_cells, 0);
    assert!(!field.is_pest_active());
}

#[test]
fn infested_crop_loses_health_and_nutrients_drain() {
    // Mild cold: regeneration alone cannot offset pest damage.
    let mut cfg = still_weather(3, 3, 12.0);
    cfg.pest.p_spread = 1.0;
    let mut clean = Field::new(cfg.clone()).unwrap();
    let mut infested = Field::new(cfg).unwrap();
    for f in [&mut clean, &mut infested] {
        for row in 0..3 {
            for col in 0..3 {
                f.plant_seed(row, col, 3).unwrap();
            }
        }
    }
    infested.apply_pest();
    for _ in 0..10 {
        clean.step();
        infested.step();
    }
    assert!(infested.crop().health().sum() < clean.crop().health().sum());
    assert!(infested.nutrients().sum() < clean.nutrients().sum());
}
