//! Search term report analysis.
//!
//! A raw report is normalized once into a [`CanonicalTable`], classified into
//! four independent performance buckets, and can be narrowed further with an
//! ad-hoc [`FilterSpec`] that only [`validate`] can produce from untrusted
//! JSON.

pub mod classify;
pub mod config;
pub mod data;
pub mod query;
pub mod report;
pub mod state;

pub use classify::{classify, Category, Classification};
pub use config::{ConfigError, Thresholds};
pub use data::{normalize, CanonicalTable, CellValue, RawTable, Record};
pub use query::{execute, validate, FilterSpec, ValidationError};
pub use state::Analysis;
