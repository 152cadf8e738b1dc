use std::io::Write;

use serde_json::json;

use search_term_analyzer::data::loader::load_file;
use search_term_analyzer::report::{negation_rows, summarize, write_negation_csv};
use search_term_analyzer::{validate, Analysis, CanonicalTable, Category, CellValue, Thresholds, ValidationError};

const REPORT: &str = "\
Campaign ID,Customer Search Term,Match Type,Clicks,Orders,Spend,Sales,ACOS,Conversion Rate,Campaign Name (Informational only),Top-of-search Impression Share
007,golf gifts,Broad,12,0,18.50,0,0.00%,0.00%,Golf BR,12.5%
008,ferrofluid toy,Exact,4,2,3.10,40,7.75%,50.00%,Ferro EX,
009,kids golf set,Phrase,30,3,45,60,75.00%,10.00%,Golf PH,
010,magnetic fluid,close-match,20,5,10,100,10.00%,25.00%,SP - Auto,
011,Golf Gifts,Broad,15,0,20,0,0%,0%,Golf BR,
";

fn analysis() -> Analysis {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(REPORT.as_bytes()).unwrap();
    file.flush().unwrap();
    Analysis::load(file.path(), Thresholds::default()).unwrap()
}

fn terms(table: &CanonicalTable) -> Vec<&str> {
    table.records.iter().map(|r| r.search_term.as_str()).collect()
}

#[test]
fn loads_and_normalizes_a_csv_report() {
    let analysis = analysis();

    assert_eq!(analysis.raw.len(), 5);
    assert_eq!(analysis.table.len(), 5);
    assert!(!analysis.table.has_column("Top-of-search Impression Share"));

    let ferro = &analysis.table.records[1];
    assert!((ferro.acos - 0.0775).abs() < 1e-12);
    assert!((ferro.conversion_rate - 0.5).abs() < 1e-12);
    assert_eq!(ferro.campaign_name.as_deref(), Some("Ferro EX"));
    assert_eq!(
        analysis.table.records[0].extra.get("Campaign ID"),
        Some(&CellValue::String("007".into()))
    );
}

#[test]
fn every_row_lands_in_its_bucket() {
    let analysis = analysis();
    let buckets = &analysis.classification;

    assert_eq!(terms(&buckets.wasted_adspend), vec!["golf gifts", "Golf Gifts"]);
    assert_eq!(terms(&buckets.inefficient_adspend), vec!["kids golf set"]);
    assert_eq!(terms(&buckets.scaling_opportunity), vec!["ferrofluid toy"]);
    assert_eq!(terms(&buckets.harvesting_opportunity), vec!["magnetic fluid"]);
    assert!(!buckets.wasted_adspend.has_column("Campaign ID"));
}

#[test]
fn broad_term_with_clicks_and_no_orders_is_only_wasted() {
    let analysis = analysis();
    let golf_gifts = &analysis.table.records[0];

    let hits: Vec<Category> = Category::ALL
        .into_iter()
        .filter(|c| c.matches(golf_gifts, &analysis.thresholds))
        .collect();
    assert_eq!(hits, vec![Category::WastedAdspend]);
}

#[test]
fn untrusted_filter_runs_over_the_whole_table() {
    let analysis = analysis();
    let spec = validate(&json!({
        "mode": "any",
        "conditions": [
            {"column": "Clicks", "operator": ">=", "value": "20"},
            {"column": "Customer Search Term", "operator": "contains", "value": "FERRO"}
        ],
        "limit": "10"
    }))
    .unwrap();
    assert_eq!(spec.limit(), 10);

    let result = analysis.filter(spec, &[]);
    assert_eq!(terms(&result), vec!["ferrofluid toy", "kids golf set", "magnetic fluid"]);
}

#[test]
fn filter_over_concatenated_categories_keeps_their_order() {
    let analysis = analysis();
    let spec = validate(&json!({})).unwrap();

    let result = analysis.filter(spec, &[Category::HarvestingOpportunity, Category::WastedAdspend]);
    assert_eq!(terms(&result), vec!["magnetic fluid", "golf gifts", "Golf Gifts"]);
}

#[test]
fn filter_on_unknown_column_is_rejected() {
    let err = validate(&json!({
        "conditions": [{"column": "Campaign ID", "operator": "==", "value": 7}]
    }))
    .unwrap_err();
    assert!(matches!(err, ValidationError::SchemaViolation(_)));
}

#[test]
fn wasted_terms_become_one_negative_per_campaign() {
    let analysis = analysis();
    let rows = negation_rows(&analysis.classification.wasted_adspend);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].keyword_text, "golf gifts");
    assert_eq!(rows[0].campaign_name, "Golf BR");

    let out = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    write_negation_csv(&rows, out.reopen().unwrap()).unwrap();

    let sheet = load_file(out.path()).unwrap();
    assert_eq!(sheet.len(), 1);
    assert_eq!(sheet.columns[0], "Product");
    assert_eq!(sheet.rows[0][9], CellValue::String("Negative Exact".into()));
}

#[test]
fn summary_counts_match_classification() {
    let analysis = analysis();
    let summary = summarize(&analysis.classification);

    assert_eq!(summary.categories[0].count, 2);
    assert_eq!(summary.categories[0].total_clicks, 27);
    assert_eq!(summary.total.count, 5);
    assert_eq!(summary.total.total_orders, 10);
}

#[test]
fn unsupported_extension_is_an_error() {
    let file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
    let err = load_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("Unsupported file extension"));
}
