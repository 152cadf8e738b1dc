/// Data layer: raw tables, loading, and normalization.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RawTable (untyped cells)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize  │  trim headers, parse percentages, zero-fill numbers
///   └───────────┘
///        │
///        ▼
///   ┌────────────────┐
///   │ CanonicalTable  │  Vec<Record>, read-only from here on
///   └────────────────┘
/// ```

pub mod loader;
pub mod model;
pub mod normalize;

pub use model::{columns, CanonicalTable, CellValue, RawTable, Record};
pub use normalize::normalize;
