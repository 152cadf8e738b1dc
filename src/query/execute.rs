use std::collections::HashSet;

use log::debug;

use super::spec::{Condition, FilterSpec, Mode, TextPredicate};
use crate::data::{CanonicalTable, Record};

/// Apply a validated spec to `table`.
///
/// Returns the matching rows in their original order, at most
/// `spec.limit()` of them. With no conditions the first `limit` rows are
/// returned. Cannot fail: the validator already settled legality.
pub fn execute(table: &CanonicalTable, spec: FilterSpec) -> CanonicalTable {
    let limit = spec.limit();
    if table.is_empty() {
        return table.with_records(Vec::new());
    }
    if spec.conditions().is_empty() {
        return table.with_records(table.records.iter().take(limit).cloned().collect());
    }

    let masks: Vec<Vec<bool>> = spec
        .conditions()
        .iter()
        .map(|condition| condition_mask(&table.records, condition))
        .collect();
    let keep = combine(&masks, spec.mode(), table.len());

    let records: Vec<Record> = table
        .records
        .iter()
        .zip(keep)
        .filter_map(|(record, keep)| keep.then(|| record.clone()))
        .take(limit)
        .collect();

    debug!(
        "filter ({} conditions, mode {}) kept {} of {} rows",
        spec.conditions().len(),
        spec.mode().as_str(),
        records.len(),
        table.len()
    );
    table.with_records(records)
}

// ---------------------------------------------------------------------------
// Masks
// ---------------------------------------------------------------------------

fn condition_mask(records: &[Record], condition: &Condition) -> Vec<bool> {
    match condition {
        Condition::Numeric { column, predicate } => records
            .iter()
            .map(|r| predicate.test(column.value(r)))
            .collect(),
        Condition::Text { column, predicate } => {
            let matcher = TextMatcher::new(predicate);
            records
                .iter()
                .map(|r| matcher.test(&column.value(r).to_lowercase()))
                .collect()
        }
    }
}

/// A text predicate with its payload lower-cased once up front.
enum TextMatcher {
    Contains(String),
    Equals(String),
    In(HashSet<String>),
    NotIn(HashSet<String>),
}

impl TextMatcher {
    fn new(predicate: &TextPredicate) -> Self {
        let folded = |items: &[String]| -> HashSet<String> {
            items.iter().map(|s| s.to_lowercase()).collect()
        };
        match predicate {
            TextPredicate::Contains(s) => TextMatcher::Contains(s.to_lowercase()),
            TextPredicate::Equals(s) => TextMatcher::Equals(s.to_lowercase()),
            TextPredicate::In(items) => TextMatcher::In(folded(items.as_slice())),
            TextPredicate::NotIn(items) => TextMatcher::NotIn(folded(items.as_slice())),
        }
    }

    /// `cell` must already be lower-cased.
    fn test(&self, cell: &str) -> bool {
        match self {
            TextMatcher::Contains(needle) => cell.contains(needle.as_str()),
            TextMatcher::Equals(expected) => cell == expected,
            TextMatcher::In(set) => set.contains(cell),
            TextMatcher::NotIn(set) => !set.contains(cell),
        }
    }
}

fn combine(masks: &[Vec<bool>], mode: Mode, rows: usize) -> Vec<bool> {
    (0..rows)
        .map(|i| match mode {
            Mode::All => masks.iter().all(|m| m[i]),
            Mode::Any => masks.iter().any(|m| m[i]),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::data::columns::*;
    use crate::query::validate;

    fn table() -> CanonicalTable {
        let rows: [(&str, &str, Option<&str>, u64, f64); 10] = [
            ("kids golf clubs", "Exact", Some("Golf EX"), 1, 0.10),
            ("junior golf set", "Phrase", Some("Golf PH"), 2, 0.20),
            ("ferrofluid", "Broad", None, 3, 0.30),
            ("Ferrofluid Display", "close-match", Some("Auto"), 4, 0.40),
            ("magnetic fluid", "loose-match", Some("Auto"), 5, 0.50),
            ("wicker basket", "Exact", Some("Baskets"), 6, 0.60),
            ("golf gifts", "Broad", Some("Golf BR"), 7, 0.70),
            ("stem toy", "substitutes", Some("Auto"), 8, 0.80),
            ("play9 card game", "Exact", Some("Cards"), 9, 0.90),
            ("deals", "-", None, 10, 1.00),
        ];
        CanonicalTable {
            columns: vec![
                SEARCH_TERM.into(),
                MATCH_TYPE.into(),
                CAMPAIGN_NAME.into(),
                CLICKS.into(),
                ACOS.into(),
            ],
            records: rows
                .iter()
                .map(|(term, match_type, campaign, clicks, acos)| Record {
                    search_term: term.to_string(),
                    match_type: match_type.to_string(),
                    campaign_name: campaign.map(str::to_string),
                    clicks: *clicks,
                    acos: *acos,
                    ..Record::default()
                })
                .collect(),
        }
    }

    fn run(spec: serde_json::Value) -> Vec<u64> {
        let spec = validate(&spec).unwrap();
        execute(&table(), spec).records.iter().map(|r| r.clicks).collect()
    }

    #[test]
    fn all_intersects_and_any_unions() {
        let a = json!({"column": "Clicks", "operator": "between", "value": [1, 3]});
        let b = json!({"column": "Clicks", "operator": "between", "value": [3, 5]});

        assert_eq!(run(json!({"mode": "all", "conditions": [a, b]})), vec![3]);
        assert_eq!(run(json!({"mode": "any", "conditions": [a, b]})), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn all_can_be_empty() {
        let spec = json!({"conditions": [
            {"column": "Clicks", "operator": "<", "value": 3},
            {"column": "Clicks", "operator": ">", "value": 8}
        ]});
        assert!(run(spec).is_empty());
    }

    #[test]
    fn limit_keeps_first_matches_in_order() {
        let spec = json!({"limit": 2, "conditions": [
            {"column": "Clicks", "operator": ">=", "value": 6}
        ]});
        assert_eq!(run(spec), vec![6, 7]);
    }

    #[test]
    fn no_conditions_returns_head() {
        assert_eq!(run(json!({"limit": 3})), vec![1, 2, 3]);
        assert_eq!(run(json!({})).len(), 10);
    }

    #[test]
    fn empty_table_returns_empty() {
        let spec = validate(&json!({})).unwrap();
        let empty = table().with_records(Vec::new());
        let out = execute(&empty, spec);
        assert!(out.is_empty());
        assert_eq!(out.columns, empty.columns);
    }

    #[test]
    fn text_comparisons_ignore_case() {
        assert_eq!(
            run(json!({"conditions": [{"column": "Customer Search Term", "operator": "contains", "value": "FERRO"}]})),
            vec![3, 4]
        );
        assert_eq!(
            run(json!({"conditions": [{"column": "Match Type", "operator": "equals", "value": "exact"}]})),
            vec![1, 6, 9]
        );
        assert_eq!(
            run(json!({"conditions": [{"column": "Match Type", "operator": "in", "value": ["BROAD", "Phrase"]}]})),
            vec![2, 3, 7]
        );
        assert_eq!(
            run(json!({"conditions": [{"column": "Match Type", "operator": "not_in", "value": ["exact", "phrase", "broad"]}]})),
            vec![4, 5, 8, 10]
        );
    }

    #[test]
    fn contains_is_literal_not_a_pattern() {
        assert!(run(json!({"conditions": [
            {"column": "Customer Search Term", "operator": "contains", "value": "golf.*"}
        ]}))
        .is_empty());
    }

    #[test]
    fn contains_without_value_is_not_a_wildcard() {
        assert!(run(json!({"conditions": [
            {"column": "Customer Search Term", "operator": "contains"}
        ]}))
        .is_empty());
    }

    #[test]
    fn missing_text_is_empty_string() {
        assert_eq!(
            run(json!({"conditions": [{"column": "Campaign Name (Informational only)", "operator": "equals", "value": ""}]})),
            vec![3, 10]
        );
        assert_eq!(
            run(json!({"conditions": [{"column": "Campaign Name (Informational only)", "operator": "contains", "value": ""}]}))
                .len(),
            10
        );
    }

    #[test]
    fn numeric_operators() {
        let op = |operator: &str, value: serde_json::Value| {
            run(json!({"conditions": [{"column": "ACOS", "operator": operator, "value": value}]}))
        };
        assert_eq!(op(">", json!(0.8)), vec![9, 10]);
        assert_eq!(op("<=", json!(0.2)), vec![1, 2]);
        assert_eq!(op("==", json!(0.5)), vec![5]);
        assert_eq!(op("!=", json!(0.5)).len(), 9);
        assert_eq!(op("<", json!(0.1)), Vec::<u64>::new());
    }

    #[test]
    fn columns_absent_from_input_read_as_zero() {
        let spec = json!({"conditions": [{"column": "Spend", "operator": "==", "value": 0}]});
        assert_eq!(run(spec).len(), 10);
    }
}
