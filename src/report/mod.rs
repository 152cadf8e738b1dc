//! Outputs derived from a classification: headline figures and the bulk
//! negation sheet for Wasted Adspend.

pub mod negation;
pub mod summary;

pub use negation::{negation_rows, write_negation_csv, NegationRow, NEGATION_COLUMNS};
pub use summary::{summarize, CategorySummary, Summary};
