use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};

struct Campaign {
    id: &'static str,
    name: &'static str,
    ad_group_id: &'static str,
    ad_group_name: &'static str,
    portfolio: &'static str,
}

static CAMPAIGNS: [Campaign; 5] = [
    Campaign {
        id: "514290153054958",
        name: "\"kids golf clubs 3-5\" - EX - HSV - Kids Putter - Incrementum",
        ad_group_id: "338763421328727",
        ad_group_name: "03. Kids Putter - Extendable Silver",
        portfolio: "Go for it Golf",
    },
    Campaign {
        id: "286611797534744",
        name: "\"kids golf clubs\" - 10K HSV - EX - Junior Golf Club Set - Incrementum",
        ad_group_id: "447190817537962",
        ad_group_name: "28. November - Junior Golf Club Set",
        portfolio: "Go for it Golf",
    },
    Campaign {
        id: "507042941633893",
        name: "2K HSV - BR - Ferrofluid - SKC - Incrementum",
        ad_group_id: "451442274269531",
        ad_group_name: "01. Ferrofluid - Pure Source + Stem Source",
        portfolio: "Science Kits Central",
    },
    Campaign {
        id: "393518651546755",
        name: "SP - Low Bid Auto - Ferrofluid - Close 1",
        ad_group_id: "557880985911089",
        ad_group_name: "25. Ferrofluid Auto",
        portfolio: "Science Kits Central",
    },
    Campaign {
        id: "556268903645598",
        name: "200 LSV - PH - Competitor Brand - Equalizer Golf Card - Incrementum",
        ad_group_id: "307784767455836",
        ad_group_name: "14. Equalizer On-Course Golf Card Game",
        portfolio: "Go for it Golf",
    },
];

static SEARCH_TERMS: [&str; 30] = [
    "kids golf clubs",
    "kids golf set",
    "junior golf clubs",
    "toddler golf clubs",
    "golf clubs for kids 3-5",
    "left handed kids golf clubs",
    "ferrofluid",
    "ferrofluid display",
    "magnetic ferrofluid",
    "ferrofluid toy",
    "magnetic fluid",
    "wicker basket",
    "storage basket",
    "card game for golfers",
    "golf card game",
    "golf gift for men",
    "play9 card game",
    "golf gifts",
    "science kit for kids",
    "stem toy",
    "cool science gifts",
    "desk toy magnetic",
    "backyard games",
    "gift for boys age 5",
    "christmas gift boys",
    "prime deal",
    "cheap golf clubs",
    "top rated kids golf",
    "putting practice",
    "golf swing trainer",
];

const COLUMNS: [&str; 26] = [
    "Product",
    "Campaign ID",
    "Ad Group ID",
    "Keyword ID",
    "Campaign Name (Informational only)",
    "Ad Group Name (Informational only)",
    "Portfolio Name (Informational only)",
    "State",
    "Campaign State (Informational only)",
    "Bid",
    "Keyword Text",
    "Match Type",
    "Product Targeting Expression",
    "Resolved Product Targeting Expression (Informational only)",
    "Customer Search Term",
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

const MANUAL_MATCH_TYPES: [&str; 3] = ["Exact", "Phrase", "Broad"];
const AUTO_MATCH_TYPES: [&str; 4] = ["close-match", "loose-match", "complements", "substitutes"];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Inclusive integer range.
    fn int(&mut self, low: u64, high: u64) -> u64 {
        low + self.next_u64() % (high - low + 1)
    }

    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_f64()
    }

    fn choose<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.next_u64() as usize % items.len()]
    }

    /// Fisher-Yates
    fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.next_u64() as usize % (i + 1);
            items.swap(i, j);
        }
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn pct(v: f64) -> String {
    format!("{:.2}%", v * 100.0)
}

fn ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 {
        num / den
    } else {
        0.0
    }
}

struct Metrics {
    impressions: u64,
    clicks: u64,
    orders: u64,
    units: u64,
    spend: f64,
    sales: f64,
    bid: f64,
}

fn make_row(
    rng: &mut SimpleRng,
    campaign: &Campaign,
    search_term: &str,
    keyword_text: &str,
    match_type: &str,
    m: Metrics,
) -> Vec<String> {
    let clicks = m.clicks as f64;
    vec![
        "Sponsored Products".into(),
        campaign.id.into(),
        campaign.ad_group_id.into(),
        rng.int(100_000_000_000_000, 999_999_999_999_999).to_string(),
        campaign.name.into(),
        campaign.ad_group_name.into(),
        campaign.portfolio.into(),
        "enabled".into(),
        "enabled".into(),
        format!("{:.2}", m.bid),
        keyword_text.into(),
        match_type.into(),
        String::new(),
        String::new(),
        search_term.into(),
        m.impressions.to_string(),
        m.clicks.to_string(),
        pct(ratio(clicks, m.impressions as f64)),
        format!("{:.2}", m.spend),
        format!("{:.2}", m.sales),
        m.orders.to_string(),
        m.units.to_string(),
        pct(ratio(m.orders as f64, clicks)),
        pct(ratio(m.spend, m.sales)),
        format!("{:.2}", ratio(m.spend, clicks)),
        format!("{:.2}", ratio(m.sales, m.spend)),
    ]
}

/// 100 shuffled report rows, 25 per bucket archetype, in `COLUMNS` order.
fn generate(seed: u64) -> Vec<Vec<String>> {
    let mut rng = SimpleRng::new(seed);
    let mut rows: Vec<Vec<String>> = Vec::with_capacity(100);

    // ---- Wasted Adspend: many clicks, no orders ----
    for _ in 0..25 {
        let campaign = rng.choose(&CAMPAIGNS);
        let term = *rng.choose(&SEARCH_TERMS);
        let match_type = *rng.choose(&MANUAL_MATCH_TYPES);
        let clicks = rng.int(10, 40);
        let metrics = Metrics {
            impressions: rng.int(300, 5000),
            clicks,
            orders: 0,
            units: 0,
            spend: round2(clicks as f64 * rng.uniform(0.5, 2.5)),
            sales: 0.0,
            bid: round2(rng.uniform(0.5, 3.0)),
        };
        rows.push(make_row(&mut rng, campaign, term, term, match_type, metrics));
    }

    // ---- Inefficient Adspend: orders, but ACOS above target ----
    for _ in 0..25 {
        let campaign = rng.choose(&CAMPAIGNS);
        let term = *rng.choose(&SEARCH_TERMS);
        let match_type = *rng.choose(&MANUAL_MATCH_TYPES);
        let orders = rng.int(1, 4);
        let sales = round2(orders as f64 * rng.uniform(8.0, 35.0));
        let metrics = Metrics {
            impressions: rng.int(500, 8000),
            clicks: rng.int(15, 60),
            orders,
            units: orders + rng.int(0, 2),
            spend: round2(sales * rng.uniform(0.35, 0.90)),
            sales,
            bid: round2(rng.uniform(0.8, 3.5)),
        };
        rows.push(make_row(&mut rng, campaign, term, term, match_type, metrics));
    }

    // ---- Scaling Opportunity: exact, converting, few clicks ----
    for _ in 0..25 {
        let campaign = rng.choose(&CAMPAIGNS);
        let term = *rng.choose(&SEARCH_TERMS);
        let clicks = rng.int(2, 9);
        let orders = rng.int(1, 3);
        let metrics = Metrics {
            impressions: rng.int(50, 400),
            clicks,
            orders,
            units: orders + rng.int(0, 1),
            sales: round2(orders as f64 * rng.uniform(12.0, 40.0)),
            spend: round2(clicks as f64 * rng.uniform(0.4, 1.8)),
            bid: round2(rng.uniform(0.5, 2.0)),
        };
        rows.push(make_row(&mut rng, campaign, term, term, "Exact", metrics));
    }

    // ---- Harvesting Opportunity: auto targeting, several orders ----
    for _ in 0..25 {
        let campaign = rng.choose(&CAMPAIGNS);
        let term = *rng.choose(&SEARCH_TERMS);
        let match_type = *rng.choose(&AUTO_MATCH_TYPES);
        let clicks = rng.int(8, 50);
        let orders = rng.int(3, 10);
        let metrics = Metrics {
            impressions: rng.int(200, 6000),
            clicks,
            orders,
            units: orders + rng.int(0, 3),
            sales: round2(orders as f64 * rng.uniform(10.0, 35.0)),
            spend: round2(clicks as f64 * rng.uniform(0.3, 1.5)),
            bid: round2(rng.uniform(0.3, 1.5)),
        };
        rows.push(make_row(&mut rng, campaign, term, "", match_type, metrics));
    }

    rng.shuffle(&mut rows);
    rows
}

fn write_csv<W: Write>(rows: &[Vec<String>], output: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(COLUMNS)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_search_terms.csv"));

    let rows = generate(42);
    let file = File::create(&output_path)
        .with_context(|| format!("creating {}", output_path.display()))?;
    write_csv(&rows, BufWriter::new(file))?;

    println!("Generated {} rows -> {}", rows.len(), output_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use search_term_analyzer::data::loader::read_csv;
    use search_term_analyzer::{classify, normalize, Thresholds};

    use super::*;

    fn sample_csv() -> Vec<u8> {
        let mut out = Vec::new();
        write_csv(&generate(42), &mut out).unwrap();
        out
    }

    #[test]
    fn generation_is_deterministic() {
        assert_eq!(generate(42), generate(42));
        assert_ne!(generate(42), generate(7));
        assert!(generate(42).iter().all(|row| row.len() == COLUMNS.len()));
    }

    #[test]
    fn sample_covers_every_bucket() {
        let raw = read_csv(sample_csv().as_slice()).unwrap();
        assert_eq!(raw.len(), 100);

        let classification = classify(&normalize(&raw), &Thresholds::default());
        assert_eq!(classification.wasted_adspend.len(), 25);
        assert_eq!(classification.scaling_opportunity.len(), 25);
        assert_eq!(classification.harvesting_opportunity.len(), 25);
        assert!(classification.inefficient_adspend.len() >= 25);
    }

    #[test]
    fn percentages_are_written_with_a_percent_sign() {
        let raw = read_csv(sample_csv().as_slice()).unwrap();
        for column in ["Click-through Rate", "Conversion Rate", "ACOS"] {
            let idx = raw.columns.iter().position(|c| c == column).unwrap();
            assert!(raw.rows.iter().all(|row| row[idx].to_string().ends_with('%')));
        }
    }
}
