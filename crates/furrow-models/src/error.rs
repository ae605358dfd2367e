//! Parameter validation errors.

/// A model parameter failed validation.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("parameter `{name}` = {value} must be {expected}")]
pub struct ParamError {
    /// Dotted parameter path, e.g. `"moisture.field_capacity"`.
    pub name: &'static str,
    /// The rejected value.
    pub value: f64,
    /// Human-readable constraint.
    pub expected: &'static str,
}

impl ParamError {
    pub(crate) fn finite(name: &'static str, value: f64) -> Result<(), Self> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(Self {
                name,
                value,
                expected: "finite",
            })
        }
    }

    pub(crate) fn finite_non_negative(name: &'static str, value: f64) -> Result<(), Self> {
        if value.is_finite() && value >= 0.0 {
            Ok(())
        } else {
            Err(Self {
                name,
                value,
                expected: "finite and non-negative",
            })
        }
    }

    pub(crate) fn positive(name: &'static str, value: f64) -> Result<(), Self> {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(Self {
                name,
                value,
                expected: "finite and positive",
            })
        }
    }

    pub(crate) fn probability(name: &'static str, value: f64) -> Result<(), Self> {
        if (0.0..=1.0).contains(&value) {
            Ok(())
        } else {
            Err(Self {
                name,
                value,
                expected: "in [0, 1]",
            })
        }
    }

    pub(crate) fn percent(name: &'static str, value: f64) -> Result<(), Self> {
        if (0.0..=100.0).contains(&value) {
            Ok(())
        } else {
            Err(Self {
                name,
                value,
                expected: "in [0, 100]",
            })
        }
    }

    pub(crate) fn ordered(name: &'static str, low: f64, high: f64) -> Result<(), Self> {
        if low.is_finite() && high.is_finite() && low <= high {
            Ok(())
        } else {
            Err(Self {
                name,
                value: low,
                expected: "finite and not above its upper bound",
            })
        }
    }
}
