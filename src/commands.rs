use accounts_model::{schema, validate::validate as validate_user, wire, ErrorReport, ModelError, ModelResult};
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::utils::records;

/// Lines to print on stdout and the number of rejected records.
#[derive(Debug, Default)]
pub struct Outcome {
  pub lines: Vec<String>,
  pub failed: usize,
}

#[derive(Debug, Serialize)]
struct RecordReport {
  #[serde(skip_serializing_if = "Option::is_none")]
  record: Option<usize>,
  #[serde(flatten)]
  report: ErrorReport,
}

fn render<T: Serialize>(value: &T, pretty: bool) -> ModelResult<String> {
  if pretty {
    wire::to_json_pretty(value)
  } else {
    wire::to_json(value)
  }
}

pub fn validate(text: &str, pretty: bool) -> Result<Outcome> {
  let document: Value = match serde_json::from_str(text) {
    Ok(document) => document,
    Err(err) => {
      let err = ModelError::from(err);
      warn!("Input is not valid JSON: {}", err);
      let report = RecordReport {
        record: None,
        report: err.report(),
      };
      return Ok(Outcome {
        lines: vec![render(&report, pretty)?],
        failed: 1,
      });
    },
  };

  let mut outcome = Outcome::default();
  let records = records(document);
  let total = records.len();

  for (index, candidate) in records.iter().enumerate() {
    match validate_user(candidate) {
      Ok(user) => debug!(record = index, user_id = %user.id(), "User record is valid"),
      Err(errors) => {
        let fields: Vec<&str> = errors.iter().map(|err| err.field.as_str()).collect();
        warn!(record = index, ?fields, "User record rejected");

        let report = RecordReport {
          record: Some(index),
          report: ModelError::from(errors).report(),
        };
        outcome.lines.push(render(&report, pretty)?);
        outcome.failed += 1;
      },
    }
  }

  info!(total, failed = outcome.failed, "Validated user records");
  Ok(outcome)
}

pub fn redact(text: &str, pretty: bool) -> Result<Outcome> {
  let document: Value = serde_json::from_str(text).map_err(ModelError::from)?;

  let mut outcome = Outcome::default();
  for (index, candidate) in records(document).iter().enumerate() {
    let user = wire::from_value(candidate).with_context(|| format!("record {index} is not a valid user"))?;
    outcome.lines.push(render(&user.redact(), pretty)?);
  }

  info!(total = outcome.lines.len(), "Redacted user records");
  Ok(outcome)
}

pub fn schema(pretty: bool) -> Result<Outcome> {
  Ok(Outcome {
    lines: vec![render(&schema::openapi(), pretty)?],
    failed: 0,
  })
}
