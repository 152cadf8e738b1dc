use std::io::Write;
use std::process::{Command, Stdio};

use anyhow::{bail, Context, Result};
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::error::ValidationError;
use super::schema::{vocabulary, FilterColumn, NumericOperator, TextOperator};
use super::spec::FilterSpec;
use super::validate::validate;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("prompt is empty")]
    EmptyPrompt,

    #[error("translator failed: {0}")]
    Translator(String),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Anything that turns a natural-language request into a raw filter
/// structure. Its output is never trusted; see [`parse_query`].
pub trait FilterTranslator {
    fn translate(&self, instructions: &str, prompt: &str) -> Result<JsonValue>;
}

/// Instructions handed to the translator: the exact JSON shape and the
/// legal vocabulary.
pub fn translator_instructions() -> String {
    let columns: Vec<&str> = FilterColumn::ALL.iter().map(|c| c.name()).collect();
    let numeric: Vec<&str> = NumericOperator::ALL.iter().map(|op| op.symbol()).collect();
    let text: Vec<&str> = TextOperator::ALL.iter().map(|op| op.symbol()).collect();
    let vocab = vocabulary();

    format!(
        "You convert user requests into strict JSON filters for an Amazon PPC search term report. \
         Return JSON only with this schema: \
         {{\"mode\":\"all|any\",\"conditions\":[{{\"column\":str,\"operator\":str,\"value\":any}}],\"limit\":int}}. \
         Allowed columns: {}. \
         Numeric operators: {} (between takes [min,max]). \
         Text operators: {}. \
         At most {} conditions, at most {} list values, limit at most {}. \
         For percentages, values are decimals (0.1 means 10%). \
         Never output code, SQL, markdown, explanations, or extra keys.",
        columns.join(", "),
        numeric.join(", "),
        text.join(", "),
        vocab.max_conditions,
        vocab.max_list_values,
        vocab.max_limit,
    )
}

/// Translate `prompt` and validate whatever comes back.
pub fn parse_query(translator: &dyn FilterTranslator, prompt: &str) -> Result<FilterSpec, QueryError> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(QueryError::EmptyPrompt);
    }
    let raw = translator
        .translate(&translator_instructions(), prompt)
        .map_err(|err| QueryError::Translator(format!("{err:#}")))?;
    Ok(validate(&raw)?)
}

// ---------------------------------------------------------------------------
// CommandTranslator – delegate to an external program
// ---------------------------------------------------------------------------

/// Runs an external program with the instructions in `FILTER_INSTRUCTIONS`
/// and the prompt on stdin, and parses its stdout as JSON.
#[derive(Debug, Clone)]
pub struct CommandTranslator {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandTranslator {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl FilterTranslator for CommandTranslator {
    fn translate(&self, instructions: &str, prompt: &str) -> Result<JsonValue> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env("FILTER_INSTRUCTIONS", instructions)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("starting translator '{}'", self.program))?;

        child
            .stdin
            .take()
            .context("translator stdin unavailable")?
            .write_all(prompt.as_bytes())
            .context("writing prompt to translator")?;

        let output = child.wait_with_output().context("waiting for translator")?;
        if !output.status.success() {
            bail!("translator '{}' exited with {}", self.program, output.status);
        }
        let text = String::from_utf8(output.stdout).context("translator output is not UTF-8")?;
        let text = text.trim();
        if text.is_empty() {
            return Ok(JsonValue::Object(Default::default()));
        }
        serde_json::from_str(text).context("translator output is not JSON")
    }
}
