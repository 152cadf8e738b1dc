use serde::Serialize;

use crate::classify::Category;
use crate::data::columns::*;
use crate::data::Record;

/// Most conditions a single specification may carry.
pub const MAX_CONDITIONS: usize = 8;
/// Most elements an `in` / `not_in` list may carry.
pub const MAX_LIST_VALUES: usize = 25;
/// Longest text value, in characters.
pub const MAX_TEXT_LEN: usize = 200;
pub const DEFAULT_LIMIT: usize = 50;
pub const MIN_LIMIT: usize = 1;
pub const MAX_LIMIT: usize = 200;

// ---------------------------------------------------------------------------
// Columns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Numeric,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextColumn {
    SearchTerm,
    CampaignName,
    AdGroupName,
    PortfolioName,
    MatchType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericColumn {
    Impressions,
    Clicks,
    Spend,
    Sales,
    Orders,
    Acos,
    ConversionRate,
    Cpc,
    Roas,
}

/// A column a filter condition may reference. The kind is part of the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterColumn {
    Text(TextColumn),
    Numeric(NumericColumn),
}

impl TextColumn {
    pub fn name(self) -> &'static str {
        match self {
            TextColumn::SearchTerm => SEARCH_TERM,
            TextColumn::CampaignName => CAMPAIGN_NAME,
            TextColumn::AdGroupName => AD_GROUP_NAME,
            TextColumn::PortfolioName => PORTFOLIO_NAME,
            TextColumn::MatchType => MATCH_TYPE,
        }
    }

    /// The record's value; absent names read as "".
    pub fn value(self, record: &Record) -> &str {
        match self {
            TextColumn::SearchTerm => &record.search_term,
            TextColumn::CampaignName => record.campaign_name.as_deref().unwrap_or(""),
            TextColumn::AdGroupName => record.ad_group_name.as_deref().unwrap_or(""),
            TextColumn::PortfolioName => record.portfolio_name.as_deref().unwrap_or(""),
            TextColumn::MatchType => &record.match_type,
        }
    }
}

impl NumericColumn {
    pub fn name(self) -> &'static str {
        match self {
            NumericColumn::Impressions => IMPRESSIONS,
            NumericColumn::Clicks => CLICKS,
            NumericColumn::Spend => SPEND,
            NumericColumn::Sales => SALES,
            NumericColumn::Orders => ORDERS,
            NumericColumn::Acos => ACOS,
            NumericColumn::ConversionRate => CONVERSION_RATE,
            NumericColumn::Cpc => CPC,
            NumericColumn::Roas => ROAS,
        }
    }

    /// The record's value as a finite number; anything else reads as 0.
    pub fn value(self, record: &Record) -> f64 {
        let v = match self {
            NumericColumn::Impressions => record.impressions as f64,
            NumericColumn::Clicks => record.clicks as f64,
            NumericColumn::Spend => record.spend,
            NumericColumn::Sales => record.sales,
            NumericColumn::Orders => record.orders as f64,
            NumericColumn::Acos => record.acos,
            NumericColumn::ConversionRate => record.conversion_rate,
            NumericColumn::Cpc => record.cpc,
            NumericColumn::Roas => record.roas,
        };
        if v.is_finite() {
            v
        } else {
            0.0
        }
    }
}

impl FilterColumn {
    /// The fourteen filterable columns, in report order.
    pub const ALL: [FilterColumn; 14] = [
        FilterColumn::Text(TextColumn::SearchTerm),
        FilterColumn::Text(TextColumn::CampaignName),
        FilterColumn::Text(TextColumn::AdGroupName),
        FilterColumn::Text(TextColumn::PortfolioName),
        FilterColumn::Text(TextColumn::MatchType),
        FilterColumn::Numeric(NumericColumn::Impressions),
        FilterColumn::Numeric(NumericColumn::Clicks),
        FilterColumn::Numeric(NumericColumn::Spend),
        FilterColumn::Numeric(NumericColumn::Sales),
        FilterColumn::Numeric(NumericColumn::Orders),
        FilterColumn::Numeric(NumericColumn::Acos),
        FilterColumn::Numeric(NumericColumn::ConversionRate),
        FilterColumn::Numeric(NumericColumn::Cpc),
        FilterColumn::Numeric(NumericColumn::Roas),
    ];

    pub fn name(self) -> &'static str {
        match self {
            FilterColumn::Text(c) => c.name(),
            FilterColumn::Numeric(c) => c.name(),
        }
    }

    pub fn kind(self) -> ValueKind {
        match self {
            FilterColumn::Text(_) => ValueKind::Text,
            FilterColumn::Numeric(_) => ValueKind::Numeric,
        }
    }

    /// Exact, case-sensitive lookup by header name.
    pub fn from_name(name: &str) -> Option<FilterColumn> {
        FilterColumn::ALL.into_iter().find(|c| c.name() == name)
    }
}

// ---------------------------------------------------------------------------
// Operators
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericOperator {
    Gt,
    Ge,
    Lt,
    Le,
    Eq,
    Ne,
    Between,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextOperator {
    Contains,
    Equals,
    In,
    NotIn,
}

impl NumericOperator {
    pub const ALL: [NumericOperator; 7] = [
        NumericOperator::Gt,
        NumericOperator::Ge,
        NumericOperator::Lt,
        NumericOperator::Le,
        NumericOperator::Eq,
        NumericOperator::Ne,
        NumericOperator::Between,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            NumericOperator::Gt => ">",
            NumericOperator::Ge => ">=",
            NumericOperator::Lt => "<",
            NumericOperator::Le => "<=",
            NumericOperator::Eq => "==",
            NumericOperator::Ne => "!=",
            NumericOperator::Between => "between",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<NumericOperator> {
        NumericOperator::ALL.into_iter().find(|op| op.symbol() == symbol)
    }
}

impl TextOperator {
    pub const ALL: [TextOperator; 4] = [
        TextOperator::Contains,
        TextOperator::Equals,
        TextOperator::In,
        TextOperator::NotIn,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            TextOperator::Contains => "contains",
            TextOperator::Equals => "equals",
            TextOperator::In => "in",
            TextOperator::NotIn => "not_in",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<TextOperator> {
        TextOperator::ALL.into_iter().find(|op| op.symbol() == symbol)
    }
}

// ---------------------------------------------------------------------------
// Vocabulary – what a translator or UI may be told is legal
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDescriptor {
    pub name: &'static str,
    pub kind: ValueKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterVocabulary {
    pub columns: Vec<ColumnDescriptor>,
    pub numeric_operators: Vec<&'static str>,
    pub text_operators: Vec<&'static str>,
    pub categories: Vec<&'static str>,
    pub max_conditions: usize,
    pub max_list_values: usize,
    pub max_text_length: usize,
    pub max_limit: usize,
}

pub fn vocabulary() -> FilterVocabulary {
    FilterVocabulary {
        columns: FilterColumn::ALL
            .into_iter()
            .map(|c| ColumnDescriptor {
                name: c.name(),
                kind: c.kind(),
            })
            .collect(),
        numeric_operators: NumericOperator::ALL.into_iter().map(NumericOperator::symbol).collect(),
        text_operators: TextOperator::ALL.into_iter().map(TextOperator::symbol).collect(),
        categories: Category::ALL.into_iter().map(Category::label).collect(),
        max_conditions: MAX_CONDITIONS,
        max_list_values: MAX_LIST_VALUES,
        max_text_length: MAX_TEXT_LEN,
        max_limit: MAX_LIMIT,
    }
}
