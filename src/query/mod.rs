/// Guarded ad-hoc filtering.
///
/// ```text
///  translator (untrusted JSON)
///        │
///        ▼
///   ┌──────────┐
///   │ validate  │  whitelist columns / operators, bound sizes → FilterSpec
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ execute   │  per-condition masks, all / any, truncate to limit
///   └──────────┘
/// ```
///
/// Nothing downstream of `validate` re-checks legality: a [`FilterSpec`] can
/// only hold numeric predicates on numeric columns and text predicates on
/// text columns.

pub mod error;
pub mod execute;
pub mod schema;
pub mod spec;
pub mod translator;
pub mod validate;

pub use error::ValidationError;
pub use execute::execute;
pub use schema::{vocabulary, FilterColumn, FilterVocabulary, ValueKind};
pub use spec::{Condition, FilterSpec, Mode};
pub use translator::{parse_query, translator_instructions, CommandTranslator, FilterTranslator, QueryError};
pub use validate::validate;
