//! Simulation engine for Furrow fields.
//!
//! Provides the [`Field`] orchestrator that owns every sub-model and the
//! clock, its [`FieldConfig`], a thread-safe [`SharedField`] handle, and
//! column-level [`sensing`] helpers that work against any
//! [`FieldAccess`](furrow_core::FieldAccess).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod field;
pub mod metrics;
pub mod sensing;
pub mod shared;

pub use config::{ConfigError, FieldConfig, MAX_TICK_HOURS};
pub use field::{advance_clock, Field, DAYS_PER_YEAR};
pub use metrics::StepMetrics;
pub use shared::SharedField;
