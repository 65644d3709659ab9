//! JSON wire codec.
//!
//! Absent optional fields are omitted on output, never written as `null`. On input both
//! omission and `null` read as absent. Timestamps are RFC 3339 in UTC.

use serde::Serialize;
use serde_json::Value;

use crate::{entities::user::User, error::ModelResult, validate::validate};

pub fn to_json<T: Serialize>(record: &T) -> ModelResult<String> {
  serde_json::to_string(record).map_err(Into::into)
}

pub fn to_json_pretty<T: Serialize>(record: &T) -> ModelResult<String> {
  serde_json::to_string_pretty(record).map_err(Into::into)
}

pub fn from_json(text: &str) -> ModelResult<User> {
  let value: Value = serde_json::from_str(text)?;
  from_value(&value)
}

pub fn from_value(value: &Value) -> ModelResult<User> {
  validate(value).map_err(Into::into)
}
