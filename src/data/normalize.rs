use log::{debug, warn};

use super::model::columns::*;
use super::model::{CanonicalTable, CellValue, RawTable, Record};

/// Columns stored either as `"1.84%"` strings or as fractions.
pub const PERCENT_COLUMNS: [&str; 3] = [CLICK_THROUGH_RATE, CONVERSION_RATE, ACOS];

/// Columns coerced to numbers, zero when missing or unparseable.
pub const NUMERIC_COLUMNS: [&str; 8] = [IMPRESSIONS, CLICKS, SPEND, SALES, ORDERS, UNITS, CPC, ROAS];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Clean a raw table into the canonical record set.
///
/// Never fails: malformed numbers become zero, missing text becomes empty.
/// Header names are trimmed and any "impression share" column is dropped.
pub fn normalize(raw: &RawTable) -> CanonicalTable {
    let mut kept: Vec<(usize, String)> = Vec::with_capacity(raw.columns.len());
    for (idx, name) in raw.columns.iter().enumerate() {
        let name = name.trim();
        if is_impression_share(name) {
            debug!("dropping column '{name}'");
            continue;
        }
        if kept.iter().any(|(_, seen)| seen == name) {
            warn!("duplicate column '{name}' ignored");
            continue;
        }
        kept.push((idx, name.to_string()));
    }

    let records: Vec<Record> = raw
        .rows
        .iter()
        .map(|row| {
            let mut record = Record::default();
            for (idx, name) in &kept {
                let cell = row.get(*idx).unwrap_or(&CellValue::Null);
                assign(&mut record, name, cell);
            }
            record
        })
        .collect();

    debug!("normalized {} rows across {} columns", records.len(), kept.len());

    CanonicalTable {
        columns: kept.into_iter().map(|(_, name)| name).collect(),
        records,
    }
}

fn is_impression_share(column: &str) -> bool {
    column.to_lowercase().contains("impression share")
}

fn assign(record: &mut Record, column: &str, cell: &CellValue) {
    match column {
        SEARCH_TERM => record.search_term = cell_text(cell),
        CAMPAIGN_NAME => record.campaign_name = optional_text(cell),
        AD_GROUP_NAME => record.ad_group_name = optional_text(cell),
        PORTFOLIO_NAME => record.portfolio_name = optional_text(cell),
        MATCH_TYPE => record.match_type = cell_text(cell),
        IMPRESSIONS => record.impressions = parse_count(cell),
        CLICKS => record.clicks = parse_count(cell),
        ORDERS => record.orders = parse_count(cell),
        UNITS => record.units = parse_count(cell),
        SPEND => record.spend = parse_number(cell),
        SALES => record.sales = parse_number(cell),
        CPC => record.cpc = parse_number(cell),
        ROAS => record.roas = parse_number(cell),
        CLICK_THROUGH_RATE => record.click_through_rate = parse_percentage(cell),
        CONVERSION_RATE => record.conversion_rate = parse_percentage(cell),
        ACOS => record.acos = parse_percentage(cell),
        other => {
            record.extra.insert(other.to_string(), cell.clone());
        }
    }
}

// ---------------------------------------------------------------------------
// Cell coercions
// ---------------------------------------------------------------------------

fn cell_text(cell: &CellValue) -> String {
    cell.to_string()
}

fn optional_text(cell: &CellValue) -> Option<String> {
    match cell {
        CellValue::Null => None,
        other => Some(other.to_string()),
    }
}

fn parse_text_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Any cell as a finite number; anything else is `0.0`.
pub fn parse_number(cell: &CellValue) -> f64 {
    match cell {
        CellValue::Integer(i) => *i as f64,
        CellValue::Float(v) if v.is_finite() => *v,
        CellValue::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        CellValue::String(s) => parse_text_number(s).unwrap_or(0.0),
        _ => 0.0,
    }
}

/// A count column: fractional parts truncate, negatives clamp to zero.
pub fn parse_count(cell: &CellValue) -> u64 {
    match cell {
        CellValue::Integer(i) => u64::try_from(*i).unwrap_or(0),
        other => {
            let v = parse_number(other);
            if v > 0.0 {
                v.trunc() as u64
            } else {
                0
            }
        }
    }
}

/// `"1.84%"` → `0.0184`; numbers and decimal-like text pass through.
pub fn parse_percentage(cell: &CellValue) -> f64 {
    match cell {
        CellValue::String(s) => {
            let s = s.trim();
            match s.strip_suffix('%') {
                Some(magnitude) => parse_text_number(magnitude).map_or(0.0, |v| v / 100.0),
                None => parse_text_number(s).unwrap_or(0.0),
            }
        }
        other => parse_number(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(columns: &[&str], rows: Vec<Vec<CellValue>>) -> RawTable {
        RawTable {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }

    #[test]
    fn percentage_string_becomes_fraction() {
        let v = parse_percentage(&CellValue::from("1.84%"));
        assert!((v - 0.0184).abs() < 1e-9);
    }

    #[test]
    fn percentage_variants() {
        assert_eq!(parse_percentage(&CellValue::from("")), 0.0);
        assert_eq!(parse_percentage(&CellValue::from("  25 % ")), 0.25);
        assert_eq!(parse_percentage(&CellValue::from("0.3")), 0.3);
        assert_eq!(parse_percentage(&CellValue::Float(0.12)), 0.12);
        assert_eq!(parse_percentage(&CellValue::from("n/a%")), 0.0);
        assert_eq!(parse_percentage(&CellValue::from("NaN")), 0.0);
        assert_eq!(parse_percentage(&CellValue::Null), 0.0);
    }

    #[test]
    fn counts_are_lossy_but_safe() {
        assert_eq!(parse_count(&CellValue::from("12")), 12);
        assert_eq!(parse_count(&CellValue::from("12.9")), 12);
        assert_eq!(parse_count(&CellValue::from("-3")), 0);
        assert_eq!(parse_count(&CellValue::from("lots")), 0);
        assert_eq!(parse_count(&CellValue::Null), 0);
        assert_eq!(parse_number(&CellValue::from(" 4.50 ")), 4.5);
        assert_eq!(parse_number(&CellValue::from("inf")), 0.0);
    }

    #[test]
    fn headers_are_trimmed_and_impression_share_dropped() {
        let table = raw(
            &["  Clicks ", "Search Term Impression Share", "Top-of-search IMPRESSION SHARE", "ACOS"],
            vec![vec![
                CellValue::from("7"),
                CellValue::from("12%"),
                CellValue::from("3%"),
                CellValue::from("45.5%"),
            ]],
        );

        let canonical = normalize(&table);

        assert_eq!(canonical.columns, vec![CLICKS, ACOS]);
        let rec = &canonical.records[0];
        assert_eq!(rec.clicks, 7);
        assert!((rec.acos - 0.455).abs() < 1e-9);
        assert!(rec.extra.is_empty());
    }

    #[test]
    fn missing_cells_and_columns_default_to_zero() {
        let table = raw(
            &[SEARCH_TERM, CAMPAIGN_NAME, ORDERS, SPEND],
            vec![vec![CellValue::from("golf gifts")]],
        );

        let canonical = normalize(&table);
        let rec = &canonical.records[0];

        assert_eq!(rec.search_term, "golf gifts");
        assert_eq!(rec.campaign_name, None);
        assert_eq!(rec.orders, 0);
        assert_eq!(rec.spend, 0.0);
        assert_eq!(rec.clicks, 0);
    }

    #[test]
    fn unknown_columns_are_carried_through() {
        let table = raw(
            &["Campaign ID", SEARCH_TERM],
            vec![vec![CellValue::from("514290153054958"), CellValue::from("stem toy")]],
        );

        let canonical = normalize(&table);

        assert_eq!(
            canonical.records[0].extra.get("Campaign ID"),
            Some(&CellValue::from("514290153054958"))
        );
    }

    #[test]
    fn normalization_is_idempotent() {
        let table = raw(
            &[
                SEARCH_TERM,
                CAMPAIGN_NAME,
                MATCH_TYPE,
                "Bid",
                CLICKS,
                ORDERS,
                SPEND,
                CONVERSION_RATE,
                ACOS,
                "Impression Share",
            ],
            vec![
                vec![
                    CellValue::from("kids golf set"),
                    CellValue::Null,
                    CellValue::from("Exact "),
                    CellValue::Float(0.5),
                    CellValue::from("9"),
                    CellValue::from("oops"),
                    CellValue::from("12.40"),
                    CellValue::from("11.11%"),
                    CellValue::from(""),
                    CellValue::from("4%"),
                ],
                vec![
                    CellValue::Integer(2024),
                    CellValue::from("Auto - Ferrofluid"),
                    CellValue::from("-"),
                    CellValue::Null,
                    CellValue::Float(3.0),
                    CellValue::Integer(4),
                    CellValue::Integer(20),
                    CellValue::Float(0.5),
                    CellValue::from("0.31"),
                    CellValue::Null,
                ],
            ],
        );

        let once = normalize(&table);
        let twice = normalize(&once.to_raw());

        assert_eq!(once, twice);
        assert_eq!(once.records[1].search_term, "2024");
    }
}
