use std::fs::File;
use std::io::{self, BufWriter, Write};

use anyhow::{anyhow, bail, Context, Result};
use log::info;
use serde_json::{json, Value as JsonValue};

use search_term_analyzer::query::{parse_query, translator_instructions, vocabulary, CommandTranslator};
use search_term_analyzer::report::{negation_rows, summarize, write_negation_csv};
use search_term_analyzer::{validate, Analysis, Category, FilterSpec, Thresholds};

use crate::cli::{AnalyzeArgs, FilterArgs, NegativesArgs, ThresholdArgs};

// ---------------------------------------------------------------------------
// Command runners
// ---------------------------------------------------------------------------

fn thresholds(args: &ThresholdArgs) -> Result<Thresholds> {
    let thresholds = match (&args.thresholds, &args.thresholds_file) {
        (Some(text), _) => Thresholds::from_json_str(text).context("invalid --thresholds")?,
        (None, Some(path)) => Thresholds::from_path(path)?,
        (None, None) => Thresholds::default(),
    };
    info!("thresholds: {thresholds:?}");
    Ok(thresholds)
}

fn print_json(value: &JsonValue) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

fn analyze_report(args: &AnalyzeArgs) -> Result<JsonValue> {
    let analysis = Analysis::load(&args.file, thresholds(&args.thresholds)?)?;
    let summary = summarize(&analysis.classification);

    let mut output = json!({
        "thresholds": analysis.thresholds,
        "summary": summary,
    });
    if args.rows {
        let rows: serde_json::Map<String, JsonValue> = analysis
            .classification
            .iter()
            .map(|(category, table)| (category.label().to_string(), json!(table.rows_as_json())))
            .collect();
        output["rows"] = JsonValue::Object(rows);
    }
    Ok(output)
}

pub fn analyze(args: AnalyzeArgs) -> Result<()> {
    print_json(&analyze_report(&args)?)
}

fn resolve_categories(names: &[String]) -> Result<Vec<Category>> {
    names
        .iter()
        .map(|name| Category::from_label(name).ok_or_else(|| anyhow!("unknown category: {name}")))
        .collect()
}

fn resolve_spec(args: &FilterArgs) -> Result<FilterSpec> {
    if let Some(text) = &args.spec {
        let raw: JsonValue = serde_json::from_str(text).context("--spec is not valid JSON")?;
        return Ok(validate(&raw)?);
    }
    let prompt = args.prompt.as_deref().unwrap_or_default();
    let Some((program, rest)) = args.translator_cmd.split_first() else {
        bail!("--prompt needs a translator command after `--`");
    };
    let translator = CommandTranslator::new(program.clone(), rest.to_vec());
    Ok(parse_query(&translator, prompt)?)
}

fn filter_report(args: &FilterArgs) -> Result<JsonValue> {
    let categories = resolve_categories(&args.categories)?;
    let spec = resolve_spec(args)?;
    let analysis = Analysis::load(&args.file, thresholds(&args.thresholds)?)?;
    let echoed = spec.to_json();
    let result = analysis.filter(spec, &categories);

    Ok(json!({
        "spec": echoed,
        "count": result.len(),
        "rows": result.rows_as_json(),
    }))
}

pub fn filter(args: FilterArgs) -> Result<()> {
    print_json(&filter_report(&args)?)
}

pub fn negatives(args: NegativesArgs) -> Result<()> {
    let analysis = Analysis::load(&args.file, thresholds(&args.thresholds)?)?;
    let rows = negation_rows(&analysis.classification.wasted_adspend);

    match &args.output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
            write_negation_csv(&rows, BufWriter::new(file))?;
            info!("wrote {} negative keywords to {}", rows.len(), path.display());
        }
        None => write_negation_csv(&rows, io::stdout().lock())?,
    }
    Ok(())
}

pub fn schema() -> Result<()> {
    print_json(&json!({
        "vocabulary": vocabulary(),
        "instructions": translator_instructions(),
    }))
}
