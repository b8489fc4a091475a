// roiwatch/src/loader.rs
//
// Batch file reader for the CLI.
//
// Accepted formats:
//   JSON Lines   one row object per line, blank lines skipped
//   JSON array   a single top-level array of row objects
//
// A malformed line fails the whole load. Rows are never dropped.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};
use tracing::info;

pub type Row = Map<String, Value>;

pub async fn load_rows(path: &Path) -> Result<Vec<Row>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading batch {}", path.display()))?;
    let rows = parse_rows(&content).with_context(|| format!("parsing batch {}", path.display()))?;
    info!("Loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

pub fn parse_rows(content: &str) -> Result<Vec<Row>> {
    if content.trim_start().starts_with('[') {
        let values: Vec<Value> = serde_json::from_str(content).context("invalid JSON array")?;
        return values
            .into_iter()
            .enumerate()
            .map(|(i, v)| into_row(v).with_context(|| format!("array element {}", i)))
            .collect();
    }

    let mut rows = Vec::new();
    for (n, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() { continue; }
        let value: Value = serde_json::from_str(line)
            .with_context(|| format!("line {}: invalid JSON", n + 1))?;
        rows.push(into_row(value).with_context(|| format!("line {}", n + 1))?);
    }
    Ok(rows)
}

fn into_row(value: Value) -> Result<Row> {
    match value {
        Value::Object(map) => Ok(map),
        other => bail!("expected a JSON object, got {}", kind(&other)),
    }
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null      => "null",
        Value::Bool(_)   => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_)  => "an array",
        Value::Object(_) => "an object",
    }
}
