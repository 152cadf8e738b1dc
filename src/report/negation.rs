use std::collections::HashSet;
use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::data::CanonicalTable;

/// Header row of the bulk negation sheet, in upload order.
pub const NEGATION_COLUMNS: [&str; 21] = [
    "Product",
    "Entity",
    "Campaign Name (Informational only)",
    "Ad Group Name (Informational only)",
    "Portfolio Name (Informational only)",
    "State",
    "Campaign State (Informational only)",
    "Ad Group State (Informational only)",
    "Keyword Text",
    "Match Type",
    "Impressions",
    "Clicks",
    "Click-through Rate",
    "Spend",
    "Sales",
    "Orders",
    "Units",
    "Conversion Rate",
    "ACOS",
    "CPC",
    "ROAS",
];

/// One "Campaign Negative Keyword" row. Field order matches
/// [`NEGATION_COLUMNS`]; metrics are always zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NegationRow {
    pub product: &'static str,
    pub entity: &'static str,
    pub campaign_name: String,
    pub ad_group_name: String,
    pub portfolio_name: String,
    pub state: &'static str,
    pub campaign_state: &'static str,
    pub ad_group_state: &'static str,
    pub keyword_text: String,
    pub match_type: &'static str,
    pub impressions: u8,
    pub clicks: u8,
    pub click_through_rate: u8,
    pub spend: u8,
    pub sales: u8,
    pub orders: u8,
    pub units: u8,
    pub conversion_rate: u8,
    pub acos: u8,
    pub cpc: u8,
    pub roas: u8,
}

impl NegationRow {
    fn negative_exact(search_term: &str, campaign_name: &str, portfolio_name: &str) -> Self {
        NegationRow {
            product: "Sponsored Products",
            entity: "Campaign Negative Keyword",
            campaign_name: campaign_name.to_string(),
            ad_group_name: String::new(),
            portfolio_name: portfolio_name.to_string(),
            state: "enabled",
            campaign_state: "enabled",
            ad_group_state: "",
            keyword_text: search_term.to_string(),
            match_type: "Negative Exact",
            impressions: 0,
            clicks: 0,
            click_through_rate: 0,
            spend: 0,
            sales: 0,
            orders: 0,
            units: 0,
            conversion_rate: 0,
            acos: 0,
            cpc: 0,
            roas: 0,
        }
    }
}

/// Negative-exact rows for every distinct (search term, campaign) pair in
/// the Wasted Adspend subset. Search terms compare case-insensitively; empty
/// terms are skipped; the first occurrence wins.
pub fn negation_rows(wasted: &CanonicalTable) -> Vec<NegationRow> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut rows = Vec::new();

    for record in &wasted.records {
        let term = record.search_term.trim();
        let campaign = record.campaign_name.as_deref().unwrap_or("").trim();
        if term.is_empty() || !seen.insert((term.to_lowercase(), campaign.to_string())) {
            continue;
        }
        let portfolio = record.portfolio_name.as_deref().unwrap_or("");
        rows.push(NegationRow::negative_exact(term, campaign, portfolio));
    }

    rows
}

/// Write the sheet as CSV. The header is written even when there are no rows.
pub fn write_negation_csv<W: Write>(rows: &[NegationRow], output: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(output);
    writer
        .write_record(NEGATION_COLUMNS)
        .context("writing negation header")?;
    for row in rows {
        writer.serialize(row).context("writing negation row")?;
    }
    writer.flush().context("flushing negation CSV")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Record;

    fn wasted(rows: &[(&str, Option<&str>)]) -> CanonicalTable {
        CanonicalTable {
            columns: Vec::new(),
            records: rows
                .iter()
                .map(|(term, campaign)| Record {
                    search_term: term.to_string(),
                    campaign_name: campaign.map(str::to_string),
                    portfolio_name: Some("Go for it Golf".into()),
                    clicks: 15,
                    ..Record::default()
                })
                .collect(),
        }
    }

    #[test]
    fn dedupes_on_term_and_campaign() {
        let rows = negation_rows(&wasted(&[
            ("Golf Gifts", Some("Golf BR")),
            ("golf gifts ", Some("Golf BR")),
            ("golf gifts", Some("Golf EX")),
            ("  ", Some("Golf EX")),
            ("cheap golf clubs", None),
        ]));

        let keys: Vec<(&str, &str)> = rows
            .iter()
            .map(|r| (r.keyword_text.as_str(), r.campaign_name.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![("Golf Gifts", "Golf BR"), ("golf gifts", "Golf EX"), ("cheap golf clubs", "")]
        );
        assert!(rows.iter().all(|r| r.match_type == "Negative Exact"));
        assert_eq!(rows[0].portfolio_name, "Go for it Golf");
        assert_eq!(rows[0].ad_group_name, "");
    }

    #[test]
    fn csv_has_fixed_header_and_zeroed_metrics() {
        let rows = negation_rows(&wasted(&[("ferrofluid toy", Some("SP - Auto"))]));
        let mut out = Vec::new();
        write_negation_csv(&rows, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), NEGATION_COLUMNS.join(","));
        assert_eq!(
            lines.next().unwrap(),
            "Sponsored Products,Campaign Negative Keyword,SP - Auto,,Go for it Golf,enabled,enabled,,ferrofluid toy,Negative Exact,0,0,0,0,0,0,0,0,0,0,0"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn empty_sheet_still_has_header() {
        let mut out = Vec::new();
        write_negation_csv(&[], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
    }
}
