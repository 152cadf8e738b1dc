use std::path::Path;

use anyhow::Result;
use log::info;

use crate::classify::{classify, Category, Classification};
use crate::config::Thresholds;
use crate::data::loader::load_file;
use crate::data::{normalize, CanonicalTable, RawTable};
use crate::query::{execute, FilterSpec};

// ---------------------------------------------------------------------------
// Analysis state
// ---------------------------------------------------------------------------

/// One loaded report and everything derived from it.
pub struct Analysis {
    /// The input exactly as loaded, kept for audit.
    pub raw: RawTable,

    /// Normalized records. Never modified after construction.
    pub table: CanonicalTable,

    /// Thresholds the classification was computed with.
    pub thresholds: Thresholds,

    /// The four buckets.
    pub classification: Classification,
}

impl Analysis {
    /// Normalize and classify an already-loaded raw table.
    pub fn new(raw: RawTable, thresholds: Thresholds) -> Self {
        let table = normalize(&raw);
        let classification = classify(&table, &thresholds);
        Self {
            raw,
            table,
            thresholds,
            classification,
        }
    }

    /// Load a report from disk and analyze it.
    pub fn load(path: &Path, thresholds: Thresholds) -> Result<Self> {
        let raw = load_file(path)?;
        let analysis = Self::new(raw, thresholds);
        info!(
            "{}: {} canonical rows, {} columns",
            path.display(),
            analysis.table.len(),
            analysis.table.columns.len()
        );
        Ok(analysis)
    }

    /// Re-run the buckets with different thresholds.
    pub fn reclassify(&mut self, thresholds: Thresholds) {
        self.thresholds = thresholds;
        self.classification = classify(&self.table, &thresholds);
    }

    /// Run an ad-hoc filter over the whole table, or over the concatenation of
    /// the given categories' subsets (in the order given).
    pub fn filter(&self, spec: FilterSpec, categories: &[Category]) -> CanonicalTable {
        if categories.is_empty() {
            return execute(&self.table, spec);
        }
        let scope = CanonicalTable::concat(categories.iter().map(|c| self.classification.get(*c)));
        execute(&scope, spec)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::data::columns::*;
    use crate::data::CellValue;
    use crate::query::validate;

    fn raw() -> RawTable {
        RawTable {
            columns: vec![SEARCH_TERM.into(), MATCH_TYPE.into(), CLICKS.into(), ORDERS.into()],
            rows: vec![
                vec!["a".into(), "Broad".into(), "12".into(), "0".into()],
                vec!["b".into(), "close-match".into(), "30".into(), "5".into()],
                vec!["c".into(), "Exact".into(), "25".into(), CellValue::Null],
            ],
        }
    }

    #[test]
    fn raw_table_is_kept_untouched() {
        let analysis = Analysis::new(raw(), Thresholds::default());
        assert_eq!(analysis.raw, raw());
        assert_eq!(analysis.classification.wasted_adspend.len(), 2);
    }

    #[test]
    fn filter_scopes_to_categories() {
        let analysis = Analysis::new(raw(), Thresholds::default());
        let spec = || validate(&json!({"conditions": [{"column": "Clicks", "operator": ">", "value": 20}]})).unwrap();

        let everything = analysis.filter(spec(), &[]);
        let wasted = analysis.filter(spec(), &[Category::WastedAdspend]);
        let both = analysis.filter(spec(), &[Category::HarvestingOpportunity, Category::WastedAdspend]);

        let terms = |t: &CanonicalTable| t.records.iter().map(|r| r.search_term.clone()).collect::<Vec<_>>();
        assert_eq!(terms(&everything), vec!["b", "c"]);
        assert_eq!(terms(&wasted), vec!["c"]);
        assert_eq!(terms(&both), vec!["b", "c"]);
    }

    #[test]
    fn reclassify_uses_new_thresholds() {
        let mut analysis = Analysis::new(raw(), Thresholds::default());
        analysis.reclassify(Thresholds {
            click_threshold: 20,
            ..Thresholds::default()
        });
        assert_eq!(analysis.classification.wasted_adspend.len(), 1);
    }
}
