use serde::Serialize;

use crate::classify::Classification;
use crate::data::CanonicalTable;

/// Aggregate figures for one category (or the TOTAL row).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub name: String,
    pub count: usize,
    pub total_clicks: u64,
    pub total_spend: f64,
    pub total_sales: f64,
    pub total_orders: u64,
    pub avg_acos: f64,
    pub avg_cvr: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub categories: Vec<CategorySummary>,
    pub total: CategorySummary,
}

/// Counts saturate instead of overflowing; a single count can already be
/// `u64::MAX` after normalization.
fn saturating_total(counts: impl Iterator<Item = u64>) -> u64 {
    counts.fold(0, u64::saturating_add)
}

fn summarize_table(name: &str, table: &CanonicalTable) -> CategorySummary {
    let n = table.len();
    let mean = |sum: f64| if n > 0 { sum / n as f64 } else { 0.0 };
    let records = &table.records;

    CategorySummary {
        name: name.to_string(),
        count: n,
        total_clicks: saturating_total(records.iter().map(|r| r.clicks)),
        total_spend: records.iter().map(|r| r.spend).sum(),
        total_sales: records.iter().map(|r| r.sales).sum(),
        total_orders: saturating_total(records.iter().map(|r| r.orders)),
        avg_acos: mean(records.iter().map(|r| r.acos).sum()),
        avg_cvr: mean(records.iter().map(|r| r.conversion_rate).sum()),
    }
}

/// Per-category figures in report order, plus a TOTAL row whose ACOS is
/// spend / sales and whose CVR is orders / clicks across all categories.
pub fn summarize(classification: &Classification) -> Summary {
    let categories: Vec<CategorySummary> = classification
        .iter()
        .map(|(category, table)| summarize_table(category.label(), table))
        .collect();

    let total_clicks = saturating_total(categories.iter().map(|c| c.total_clicks));
    let total_spend: f64 = categories.iter().map(|c| c.total_spend).sum();
    let total_sales: f64 = categories.iter().map(|c| c.total_sales).sum();
    let total_orders = saturating_total(categories.iter().map(|c| c.total_orders));

    let total = CategorySummary {
        name: "TOTAL".to_string(),
        count: categories.iter().map(|c| c.count).sum(),
        total_clicks,
        total_spend,
        total_sales,
        total_orders,
        avg_acos: if total_sales > 0.0 {
            total_spend / total_sales
        } else {
            0.0
        },
        avg_cvr: if total_clicks > 0 {
            total_orders as f64 / total_clicks as f64
        } else {
            0.0
        },
    };

    Summary { categories, total }
}
