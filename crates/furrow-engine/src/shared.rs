//! A cloneable, thread-safe handle to a [`Field`].
//!
//! Sensing agents, actuators, and the clock driver can each hold a
//! [`SharedField`] clone. Every call takes the lock for its whole duration,
//! so a step never interleaves with an actuation.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use furrow_core::{
    DroneReading, EventControl, FieldAccess, FieldError, GridShape, SoilReading,
};

use crate::config::{ConfigError, FieldConfig};
use crate::field::Field;
use crate::metrics::StepMetrics;

/// Mutex-guarded shared [`Field`].
///
/// A poisoned lock is recovered: a panicking step commits nothing, so the
/// guarded field is always in a consistent state.
#[derive(Clone, Debug)]
pub struct SharedField {
    inner: Arc<Mutex<Field>>,
}

impl SharedField {
    /// Wrap an existing field.
    pub fn new(field: Field) -> Self {
        Self {
            inner: Arc::new(Mutex::new(field)),
        }
    }

    /// Build a field from `config` and wrap it.
    pub fn from_config(config: FieldConfig) -> Result<Self, ConfigError> {
        Field::new(config).map(Self::new)
    }

    /// Lock the field for a sequence of calls that must not interleave
    /// with other handles.
    pub fn lock(&self) -> MutexGuard<'_, Field> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with exclusive access to the field.
    pub fn with<T>(&self, f: impl FnOnce(&mut Field) -> T) -> T {
        f(&mut self.lock())
    }

    /// Run one tick.
    pub fn step(&self) -> StepMetrics {
        self.lock().step()
    }

    /// Clone the current field state.
    pub fn snapshot(&self) -> Field {
        self.lock().clone()
    }
}

impl From<Field> for SharedField {
    fn from(field: Field) -> Self {
        Self::new(field)
    }
}

impl FieldAccess for SharedField {
    fn shape(&self) -> GridShape {
        self.lock().shape()
    }

    fn get_soil(&self, row: u32, col: u32) -> Result<SoilReading, FieldError> {
        self.lock().get_soil(row, col)
    }

    fn get_drone(&self, row: u32, col: u32) -> Result<DroneReading, FieldError> {
        self.lock().get_drone(row, col)
    }

    fn apply_irrigation(&mut self, row: u32, col: u32, flow_rate: f64) -> Result<(), FieldError> {
        self.lock().apply_irrigation(row, col, flow_rate)
    }

    fn apply_fertilize(&mut self, row: u32, col: u32, amount_kg: f64) -> Result<(), FieldError> {
        self.lock().apply_fertilize(row, col, amount_kg)
    }

    fn apply_pesticide(&mut self, row: u32, col: u32) -> Result<(), FieldError> {
        self.lock().apply_pesticide(row, col)
    }

    fn plant_seed(&mut self, row: u32, col: u32, plant_type: u8) -> Result<(), FieldError> {
        self.lock().plant_seed(row, col, plant_type)
    }

    fn harvest(&mut self, row: u32, col: u32) -> Result<f64, FieldError> {
        self.lock().harvest(row, col)
    }
}

impl EventControl for SharedField {
    fn apply_rain(&mut self, intensity: u8) -> Result<(), FieldError> {
        self.lock().apply_rain(intensity)
    }

    fn stop_rain(&mut self) {
        self.lock().stop_rain()
    }

    fn toggle_drought(&mut self) -> bool {
        self.lock().toggle_drought()
    }

    fn apply_pest(&mut self) -> (u32, u32) {
        self.lock().apply_pest()
    }

    fn remove_pest(&mut self) {
        self.lock().remove_pest()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn shared() -> SharedField {
        SharedField::from_config(FieldConfig {
            seed: 3,
            ..FieldConfig::with_size(4, 4)
        })
        .unwrap()
    }

    #[test]
    fn shared_field_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SharedField>();
    }

    #[test]
    fn clones_see_the_same_field() {
        let a = shared();
        let mut b = a.clone();
        b.plant_seed(1, 1, 0).unwrap();
        assert!(a.get_drone(1, 1).unwrap().stage.is_planted());
        a.step();
        assert_eq!(b.lock().tick(), 1);
    }

    #[test]
    fn concurrent_steps_and_actuation_serialize() {
        let field = shared();
        let stepper = {
            let f = field.clone();
            thread::spawn(move || {
                for _ in 0..100 {
                    f.step();
                }
            })
        };
        let actuator = {
            let mut f = field.clone();
            thread::spawn(move || {
                for i in 0..100u32 {
                    f.apply_irrigation(i % 4, (i / 4) % 4, 5.0).unwrap();
                    f.apply_fertilize(i % 4, i % 4, 0.1).unwrap();
                }
            })
        };
        stepper.join().unwrap();
        actuator.join().unwrap();
        let snapshot = field.snapshot();
        assert_eq!(snapshot.tick(), 100);
        assert!(snapshot.moisture().iter().all(|m| (0.0..=100.0).contains(m)));
        assert!(snapshot.nutrients().iter().all(|n| (0.0..=100.0).contains(n)));
    }

    #[test]
    fn poisoned_lock_is_recovered() {
        let field = shared();
        let f = field.clone();
        let result = thread::spawn(move || {
            let _: () = f.with(|_| panic!("agent crashed"));
        })
        .join();
        assert!(result.is_err());
        assert_eq!(field.step().tick, 1);
    }
}
