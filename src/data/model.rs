use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::{Map as JsonMap, Value as JsonValue};

// ---------------------------------------------------------------------------
// Column headers of a Sponsored Products search term report
// ---------------------------------------------------------------------------

/// Exact header text of every column the analyzer understands.
pub mod columns {
    pub const SEARCH_TERM: &str = "Customer Search Term";
    pub const CAMPAIGN_NAME: &str = "Campaign Name (Informational only)";
    pub const AD_GROUP_NAME: &str = "Ad Group Name (Informational only)";
    pub const PORTFOLIO_NAME: &str = "Portfolio Name (Informational only)";
    pub const MATCH_TYPE: &str = "Match Type";
    pub const IMPRESSIONS: &str = "Impressions";
    pub const CLICKS: &str = "Clicks";
    pub const CLICK_THROUGH_RATE: &str = "Click-through Rate";
    pub const SPEND: &str = "Spend";
    pub const SALES: &str = "Sales";
    pub const ORDERS: &str = "Orders";
    pub const UNITS: &str = "Units";
    pub const CONVERSION_RATE: &str = "Conversion Rate";
    pub const ACOS: &str = "ACOS";
    pub const CPC: &str = "CPC";
    pub const ROAS: &str = "ROAS";
}

use columns::*;

// ---------------------------------------------------------------------------
// CellValue – a single cell of a raw input table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell as produced by a file loader, before normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64` without any text parsing.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Integer(i)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

// ---------------------------------------------------------------------------
// RawTable – loader output, untouched
// ---------------------------------------------------------------------------

/// Rows of untyped cells under the header names exactly as they appeared in
/// the source file. Rows may be shorter than the header; missing cells read as null.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    pub fn new(columns: Vec<String>) -> Self {
        RawTable {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<CellValue>) {
        self.rows.push(row);
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Record – one canonical row
// ---------------------------------------------------------------------------

/// One normalized row of the search term report.
///
/// Percentage attributes hold fractions (`0.0184` for `1.84%`). Columns that
/// were absent from the input keep their zero / empty defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub search_term: String,
    pub campaign_name: Option<String>,
    pub ad_group_name: Option<String>,
    pub portfolio_name: Option<String>,
    pub match_type: String,
    pub impressions: u64,
    pub clicks: u64,
    pub click_through_rate: f64,
    pub spend: f64,
    pub sales: f64,
    pub orders: u64,
    pub units: u64,
    pub conversion_rate: f64,
    pub acos: f64,
    pub cpc: f64,
    pub roas: f64,
    /// Input columns outside the canonical set, carried through verbatim.
    pub extra: BTreeMap<String, CellValue>,
}

impl Record {
    /// Render a column of this record back into a raw cell.
    pub fn cell(&self, column: &str) -> CellValue {
        fn optional(value: &Option<String>) -> CellValue {
            value
                .as_deref()
                .map(CellValue::from)
                .unwrap_or(CellValue::Null)
        }

        match column {
            SEARCH_TERM => CellValue::from(self.search_term.as_str()),
            CAMPAIGN_NAME => optional(&self.campaign_name),
            AD_GROUP_NAME => optional(&self.ad_group_name),
            PORTFOLIO_NAME => optional(&self.portfolio_name),
            MATCH_TYPE => CellValue::from(self.match_type.as_str()),
            IMPRESSIONS => count_cell(self.impressions),
            CLICKS => count_cell(self.clicks),
            CLICK_THROUGH_RATE => CellValue::Float(self.click_through_rate),
            SPEND => CellValue::Float(self.spend),
            SALES => CellValue::Float(self.sales),
            ORDERS => count_cell(self.orders),
            UNITS => count_cell(self.units),
            CONVERSION_RATE => CellValue::Float(self.conversion_rate),
            ACOS => CellValue::Float(self.acos),
            CPC => CellValue::Float(self.cpc),
            ROAS => CellValue::Float(self.roas),
            other => self.extra.get(other).cloned().unwrap_or(CellValue::Null),
        }
    }

    /// Reset a column to its absent-column default.
    fn clear(&mut self, column: &str) {
        match column {
            SEARCH_TERM => self.search_term.clear(),
            CAMPAIGN_NAME => self.campaign_name = None,
            AD_GROUP_NAME => self.ad_group_name = None,
            PORTFOLIO_NAME => self.portfolio_name = None,
            MATCH_TYPE => self.match_type.clear(),
            IMPRESSIONS => self.impressions = 0,
            CLICKS => self.clicks = 0,
            CLICK_THROUGH_RATE => self.click_through_rate = 0.0,
            SPEND => self.spend = 0.0,
            SALES => self.sales = 0.0,
            ORDERS => self.orders = 0,
            UNITS => self.units = 0,
            CONVERSION_RATE => self.conversion_rate = 0.0,
            ACOS => self.acos = 0.0,
            CPC => self.cpc = 0.0,
            ROAS => self.roas = 0.0,
            other => {
                self.extra.remove(other);
            }
        }
    }
}

fn count_cell(value: u64) -> CellValue {
    CellValue::Integer(i64::try_from(value).unwrap_or(i64::MAX))
}

/// Every canonical column, in report order.
pub const CANONICAL_COLUMNS: [&str; 16] = [
    SEARCH_TERM,
    CAMPAIGN_NAME,
    AD_GROUP_NAME,
    PORTFOLIO_NAME,
    MATCH_TYPE,
    IMPRESSIONS,
    CLICKS,
    CLICK_THROUGH_RATE,
    SPEND,
    SALES,
    ORDERS,
    UNITS,
    CONVERSION_RATE,
    ACOS,
    CPC,
    ROAS,
];

// ---------------------------------------------------------------------------
// CanonicalTable – the normalized record set
// ---------------------------------------------------------------------------

/// Normalized records plus the ordered list of columns they carry.
///
/// Row order is the input order and is the only ranking an unfiltered
/// listing has.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalTable {
    /// Column names present in the input (trimmed, dropped columns removed).
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl CanonicalTable {
    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// A table with the same columns holding `records`.
    pub fn with_records(&self, records: Vec<Record>) -> CanonicalTable {
        CanonicalTable {
            columns: self.columns.clone(),
            records,
        }
    }

    /// Keep only the listed columns that this table actually has, in the
    /// order given. Values of every other column are reset.
    pub fn project(&self, wanted: &[&str]) -> CanonicalTable {
        let columns: Vec<String> = wanted
            .iter()
            .filter(|c| self.has_column(c))
            .map(|c| c.to_string())
            .collect();
        let dropped: Vec<&str> = CANONICAL_COLUMNS
            .iter()
            .copied()
            .filter(|c| !columns.iter().any(|kept| kept == c))
            .collect();

        let records = self
            .records
            .iter()
            .map(|record| {
                let mut record = record.clone();
                for column in &dropped {
                    record.clear(column);
                }
                record.extra.retain(|k, _| columns.contains(k));
                record
            })
            .collect();

        CanonicalTable { columns, records }
    }

    /// Concatenate tables in order. Columns are the union, by first appearance.
    pub fn concat<'a, I>(tables: I) -> CanonicalTable
    where
        I: IntoIterator<Item = &'a CanonicalTable>,
    {
        let mut out = CanonicalTable::default();
        for table in tables {
            for column in &table.columns {
                if !out.has_column(column) {
                    out.columns.push(column.clone());
                }
            }
            out.records.extend(table.records.iter().cloned());
        }
        out
    }

    /// Render back into a raw table with the same columns.
    pub fn to_raw(&self) -> RawTable {
        let rows = self
            .records
            .iter()
            .map(|record| self.columns.iter().map(|c| record.cell(c)).collect())
            .collect();
        RawTable {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// One JSON object per record, keyed by column name.
    pub fn rows_as_json(&self) -> Vec<JsonMap<String, JsonValue>> {
        self.records
            .iter()
            .map(|record| {
                self.columns
                    .iter()
                    .map(|c| {
                        let value = serde_json::to_value(record.cell(c)).unwrap_or(JsonValue::Null);
                        (c.clone(), value)
                    })
                    .collect()
            })
            .collect()
    }
}
