use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tokio::io::AsyncReadExt;
use tracing::debug;

/// Reads the whole input, `-` meaning stdin.
pub async fn read_input(path: &Path) -> Result<String> {
  let mut text = String::new();

  if path == Path::new("-") {
    debug!("Reading records from stdin");
    tokio::io::stdin()
      .read_to_string(&mut text)
      .await
      .context("failed to read stdin")?;
  } else {
    debug!("Reading records from {}", path.display());
    text = tokio::fs::read_to_string(path)
      .await
      .with_context(|| format!("failed to read {}", path.display()))?;
  }

  Ok(text)
}

/// A document is either one record or an array of records.
pub fn records(document: Value) -> Vec<Value> {
  match document {
    Value::Array(items) => items,
    other => vec![other],
  }
}
