use serde::Serialize;
use thiserror::Error;

pub type ModelResult<T = ()> = Result<T, ModelError>;

#[derive(Debug, Error)]
pub enum ModelError {
  #[error(transparent)]
  Invalid(#[from] ValidationErrors),
  #[error("Malformed JSON: {0}")]
  Json(#[from] serde_json::Error),
}

impl ModelError {
  pub fn report(&self) -> ErrorReport {
    use ModelError::*;
    let message = self.to_string();

    let (kind, details) = match self {
      Invalid(errors) => ("INVALID_INPUT_ERROR", errors.details()),
      Json(err) => (
        "MALFORMED_JSON",
        vec![(format!("line {}", err.line()), vec![format!("{:?}", err.classify()).to_lowercase()])],
      ),
    };

    ErrorReport::new(kind, message, details)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Reason {
  #[error("is required")]
  Missing,
  #[error("must be a string")]
  NotAString,
  #[error("must be a boolean")]
  NotABoolean,
  #[error("must be one of \"user\", \"admin\"")]
  UnknownRole,
  #[error("must be an ISO-8601 timestamp")]
  InvalidTimestamp,
  #[error("must not be later than `updatedAt`")]
  CreatedAfterUpdated,
  #[error("is not part of the user record")]
  UnknownField,
  #[error("must be an object")]
  NotAnObject,
}

impl Reason {
  /// Rule code carried by `validator` errors. `required` is the crate's own code.
  pub fn code(&self) -> &'static str {
    match self {
      Reason::Missing => "required",
      Reason::NotAString => "not_a_string",
      Reason::NotABoolean => "not_a_boolean",
      Reason::UnknownRole => "unknown_role",
      Reason::InvalidTimestamp => "invalid_timestamp",
      Reason::CreatedAfterUpdated => "created_after_updated",
      Reason::UnknownField => "unknown_field",
      Reason::NotAnObject => "not_an_object",
    }
  }

  pub fn from_code(code: &str) -> Option<Self> {
    match code {
      "required" => Some(Reason::Missing),
      "not_a_string" => Some(Reason::NotAString),
      "not_a_boolean" => Some(Reason::NotABoolean),
      "unknown_role" => Some(Reason::UnknownRole),
      "invalid_timestamp" => Some(Reason::InvalidTimestamp),
      "created_after_updated" => Some(Reason::CreatedAfterUpdated),
      "unknown_field" => Some(Reason::UnknownField),
      "not_an_object" => Some(Reason::NotAnObject),
      _ => None,
    }
  }
}

impl From<Reason> for validator::ValidationError {
  fn from(reason: Reason) -> Self {
    validator::ValidationError::new(reason.code())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{field}` {reason}")]
pub struct ValidationError {
  pub field: String,
  pub reason: Reason,
}

impl ValidationError {
  pub fn new(field: impl Into<String>, reason: Reason) -> Self {
    Self {
      field: field.into(),
      reason,
    }
  }
}

/// Every offending field of one rejected candidate, in wire order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid user: {}", join(.0))]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
  pub(crate) fn new(errors: Vec<ValidationError>) -> Self {
    Self(errors)
  }

  /// Orders `validator` field errors by wire key. `fields` pairs each wire key with
  /// its Rust field name; schema-level errors are reported on `schema_field`.
  pub(crate) fn from_rules(
    rules: Option<&validator::ValidationErrors>,
    fields: &[(&str, &str)],
    schema_field: &str,
  ) -> Self {
    let mut errors = Vec::new();
    let Some(rules) = rules else {
      return Self(errors);
    };

    let field_errors = rules.field_errors();
    for &(key, name) in fields {
      let mut found: Vec<&validator::ValidationError> = field_errors
        .get(name)
        .or_else(|| field_errors.get(key))
        .map(|errs| errs.iter().collect())
        .unwrap_or_default();
      if key == schema_field {
        found.extend(field_errors.get("__all__").into_iter().flat_map(|errs| errs.iter()));
      }

      errors.extend(
        found
          .into_iter()
          .filter_map(|err| Reason::from_code(&err.code))
          .map(|reason| ValidationError::new(key, reason)),
      );
    }

    Self(errors)
  }

  pub(crate) fn push(&mut self, error: ValidationError) {
    self.0.push(error);
  }

  pub fn field(&self, name: &str) -> Option<&ValidationError> {
    self.0.iter().find(|err| err.field == name)
  }

  pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
    self.0.iter()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// Reasons grouped by field. Errors of one field are always adjacent.
  pub fn details(&self) -> Vec<(String, Vec<String>)> {
    self
      .0
      .chunk_by(|a, b| a.field == b.field)
      .map(|chunk| {
        (
          chunk[0].field.clone(),
          chunk.iter().map(|err| err.reason.to_string()).collect(),
        )
      })
      .collect()
  }
}

impl IntoIterator for ValidationErrors {
  type Item = ValidationError;
  type IntoIter = std::vec::IntoIter<ValidationError>;

  fn into_iter(self) -> Self::IntoIter {
    self.0.into_iter()
  }
}

fn join(errors: &[ValidationError]) -> String {
  errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ErrorReport {
  pub kind: String,
  pub error_message: String,
  pub details: Vec<(String, Vec<String>)>,
}

impl ErrorReport {
  pub fn new(kind: impl Into<String>, message: impl Into<String>, details: Vec<(String, Vec<String>)>) -> Self {
    Self {
      kind: kind.into(),
      error_message: message.into(),
      details,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_display_lists_every_field() {
    let errors = ValidationErrors::new(vec![
      ValidationError::new("id", Reason::Missing),
      ValidationError::new("role", Reason::UnknownRole),
    ]);

    assert_eq!(
      errors.to_string(),
      "Invalid user: `id` is required; `role` must be one of \"user\", \"admin\""
    );
  }

  #[test]
  fn test_codes_map_back_to_reasons() {
    for reason in [
      Reason::Missing,
      Reason::NotAString,
      Reason::NotABoolean,
      Reason::UnknownRole,
      Reason::InvalidTimestamp,
      Reason::CreatedAfterUpdated,
      Reason::UnknownField,
      Reason::NotAnObject,
    ] {
      assert_eq!(Reason::from_code(reason.code()), Some(reason));
    }
    assert_eq!(Reason::from_code("length"), None);
  }

  #[test]
  fn test_from_rules_orders_by_wire_key() {
    let mut rules = validator::ValidationErrors::new();
    rules.add("role", Reason::UnknownRole.into());
    rules.add("__all__", Reason::CreatedAfterUpdated.into());
    rules.add("id", Reason::Missing.into());

    let fields = [("id", "id"), ("createdAt", "created_at"), ("role", "role")];
    let errors = ValidationErrors::from_rules(Some(&rules), &fields, "createdAt");

    let got: Vec<_> = errors.iter().map(|e| (e.field.as_str(), e.reason)).collect();
    assert_eq!(
      got,
      vec![
        ("id", Reason::Missing),
        ("createdAt", Reason::CreatedAfterUpdated),
        ("role", Reason::UnknownRole),
      ]
    );
  }

  #[test]
  fn test_report_for_invalid_input() {
    let err = ModelError::from(ValidationErrors::new(vec![
      ValidationError::new("active", Reason::NotABoolean),
      ValidationError::new("createdAt", Reason::InvalidTimestamp),
    ]));

    let report = err.report();
    assert_eq!(report.kind, "INVALID_INPUT_ERROR");
    assert_eq!(
      report.details,
      vec![
        ("active".to_string(), vec!["must be a boolean".to_string()]),
        ("createdAt".to_string(), vec!["must be an ISO-8601 timestamp".to_string()]),
      ]
    );
  }

  #[test]
  fn test_report_for_malformed_json() {
    let err = ModelError::from(serde_json::from_str::<serde_json::Value>("{").unwrap_err());

    let report = err.report();
    assert_eq!(report.kind, "MALFORMED_JSON");
    assert_eq!(report.details[0].0, "line 1");
    assert_eq!(report.details[0].1, vec!["eof".to_string()]);
  }
}
