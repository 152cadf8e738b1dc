use std::fmt;

use log::info;
use serde::{Deserialize, Serialize};

use crate::config::Thresholds;
use crate::data::columns::*;
use crate::data::{CanonicalTable, Record};

/// Columns kept in every category subset, when present in the input.
pub const OUTPUT_COLUMNS: [&str; 14] = [
    SEARCH_TERM,
    CAMPAIGN_NAME,
    AD_GROUP_NAME,
    PORTFOLIO_NAME,
    MATCH_TYPE,
    IMPRESSIONS,
    CLICKS,
    SPEND,
    SALES,
    ORDERS,
    ACOS,
    CONVERSION_RATE,
    CPC,
    ROAS,
];

/// Match types a keyword can be explicitly targeted with.
const TARGETED_MATCH_TYPES: [&str; 3] = ["exact", "phrase", "broad"];

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// The four performance buckets. A record may fall into several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    WastedAdspend,
    InefficientAdspend,
    ScalingOpportunity,
    HarvestingOpportunity,
}

impl Category {
    /// All categories in report order.
    pub const ALL: [Category; 4] = [
        Category::WastedAdspend,
        Category::InefficientAdspend,
        Category::ScalingOpportunity,
        Category::HarvestingOpportunity,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::WastedAdspend => "Wasted Adspend",
            Category::InefficientAdspend => "Inefficient Adspend",
            Category::ScalingOpportunity => "Scaling Opportunity",
            Category::HarvestingOpportunity => "Harvesting Opportunity",
        }
    }

    /// Accepts the display label, the identifier, or a kebab/snake spelling,
    /// ignoring case: "Wasted Adspend", "WastedAdspend", "wasted-adspend".
    pub fn from_label(text: &str) -> Option<Category> {
        let wanted = squash(text);
        Category::ALL.into_iter().find(|c| squash(c.label()) == wanted)
    }

    /// Whether `record` belongs to this bucket under `thresholds`.
    pub fn matches(self, record: &Record, thresholds: &Thresholds) -> bool {
        match self {
            Category::WastedAdspend => {
                record.clicks >= thresholds.click_threshold && record.orders == 0
            }
            Category::InefficientAdspend => {
                record.acos >= thresholds.acos_threshold && record.orders > 0
            }
            Category::ScalingOpportunity => {
                match_type_key(record) == "exact"
                    && record.conversion_rate >= thresholds.cvr_threshold
                    && record.clicks <= thresholds.low_click_threshold
            }
            Category::HarvestingOpportunity => {
                !TARGETED_MATCH_TYPES.contains(&match_type_key(record).as_str())
                    && record.orders > thresholds.order_threshold
            }
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn squash(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn match_type_key(record: &Record) -> String {
    record.match_type.trim().to_lowercase()
}

// ---------------------------------------------------------------------------
// Classification – one subset per category
// ---------------------------------------------------------------------------

/// Rows of each bucket, in input order, projected to [`OUTPUT_COLUMNS`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    pub wasted_adspend: CanonicalTable,
    pub inefficient_adspend: CanonicalTable,
    pub scaling_opportunity: CanonicalTable,
    pub harvesting_opportunity: CanonicalTable,
}

impl Classification {
    pub fn get(&self, category: Category) -> &CanonicalTable {
        match category {
            Category::WastedAdspend => &self.wasted_adspend,
            Category::InefficientAdspend => &self.inefficient_adspend,
            Category::ScalingOpportunity => &self.scaling_opportunity,
            Category::HarvestingOpportunity => &self.harvesting_opportunity,
        }
    }

    /// Categories paired with their subsets, in report order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &CanonicalTable)> + '_ {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

/// Run all four bucket predicates over `table`.
pub fn classify(table: &CanonicalTable, thresholds: &Thresholds) -> Classification {
    let subset = |category: Category| {
        let records = table
            .records
            .iter()
            .filter(|r| category.matches(r, thresholds))
            .cloned()
            .collect();
        table.with_records(records).project(&OUTPUT_COLUMNS)
    };

    let classification = Classification {
        wasted_adspend: subset(Category::WastedAdspend),
        inefficient_adspend: subset(Category::InefficientAdspend),
        scaling_opportunity: subset(Category::ScalingOpportunity),
        harvesting_opportunity: subset(Category::HarvestingOpportunity),
    };

    for (category, rows) in classification.iter() {
        info!("{category}: {} of {} rows", rows.len(), table.len());
    }
    classification
}
