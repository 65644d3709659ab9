use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;
use validator::Validate;

use crate::{
  entities::user::{Password, PublicUser, Role, User, UserId},
  error::{Reason, ValidationError, ValidationErrors},
};

/// Wire keys in wire order, paired with the candidate field that carries them.
pub const WIRE_FIELDS: [(&str, &str); 10] = [
  ("id", "id"),
  ("username", "username"),
  ("firstname", "firstname"),
  ("lastname", "lastname"),
  ("email", "email"),
  ("password", "password"),
  ("active", "active"),
  ("createdAt", "created_at"),
  ("updatedAt", "updated_at"),
  ("role", "role"),
];

/// A user record as it arrives, before any field is trusted.
///
/// Omission and `null` both read as `None`. Keys outside the wire shape land in `unknown`.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "timestamps_in_order", skip_on_field_errors = false))]
pub struct UserCandidate {
  #[validate(required, custom(function = "is_string"))]
  pub id: Option<Value>,
  #[validate(required, custom(function = "is_string"))]
  pub username: Option<Value>,
  #[validate(required, custom(function = "is_string"))]
  pub firstname: Option<Value>,
  #[validate(required, custom(function = "is_string"))]
  pub lastname: Option<Value>,
  #[validate(required, custom(function = "is_string"))]
  pub email: Option<Value>,
  #[validate(custom(function = "is_string"))]
  pub password: Option<Value>,
  #[validate(required, custom(function = "is_bool"))]
  pub active: Option<Value>,
  #[validate(custom(function = "is_timestamp"))]
  pub created_at: Option<Value>,
  #[validate(custom(function = "is_timestamp"))]
  pub updated_at: Option<Value>,
  #[validate(custom(function = "is_role"))]
  pub role: Option<Value>,
  #[serde(flatten)]
  pub unknown: Map<String, Value>,
}

/// Checks an untyped candidate and builds a [`User`] from it.
///
/// Every offending field is reported, in wire order followed by unknown keys.
/// A candidate is either accepted whole or rejected.
pub fn validate(candidate: &Value) -> Result<User, ValidationErrors> {
  let not_an_object = || ValidationErrors::new(vec![ValidationError::new("user", Reason::NotAnObject)]);
  if !candidate.is_object() {
    return Err(not_an_object());
  }

  let candidate = UserCandidate::deserialize(candidate).map_err(|_| not_an_object())?;
  User::try_from(candidate)
}

impl TryFrom<UserCandidate> for User {
  type Error = ValidationErrors;

  fn try_from(candidate: UserCandidate) -> Result<Self, Self::Error> {
    let rules = candidate.validate().err();

    let UserCandidate {
      id,
      username,
      firstname,
      lastname,
      email,
      password,
      active,
      created_at,
      updated_at,
      role,
      unknown,
    } = candidate;

    let fields = (
      text(id),
      text(username),
      text(firstname),
      text(lastname),
      text(email),
      active.as_ref().and_then(Value::as_bool),
    );

    match fields {
      (Some(id), Some(username), Some(firstname), Some(lastname), Some(email), Some(active))
        if rules.is_none() && unknown.is_empty() =>
      {
        Ok(User {
          id: UserId::new(id),
          username,
          firstname,
          lastname,
          email,
          password: text(password).map(Password::new),
          active,
          created_at: created_at.as_ref().and_then(timestamp),
          updated_at: updated_at.as_ref().and_then(timestamp),
          role: role.as_ref().and_then(role_token),
        })
      },
      _ => {
        let mut errors = ValidationErrors::from_rules(rules.as_ref(), &WIRE_FIELDS, "createdAt");
        for key in unknown.keys() {
          errors.push(ValidationError::new(key.as_str(), Reason::UnknownField));
        }
        debug!(fields = ?errors.details(), "user candidate rejected");
        Err(errors)
      },
    }
  }
}

impl TryFrom<UserCandidate> for PublicUser {
  type Error = ValidationErrors;

  /// Same rules as [`User`], and a `password` key is refused outright.
  fn try_from(mut candidate: UserCandidate) -> Result<Self, Self::Error> {
    let carries_password = candidate.password.take().is_some();
    let user = User::try_from(candidate);
    if !carries_password {
      return user.map(PublicUser::from);
    }

    let mut errors = user.err().unwrap_or_else(|| ValidationErrors::new(Vec::new()));
    errors.push(ValidationError::new("password", Reason::UnknownField));
    Err(errors)
  }
}

fn text(value: Option<Value>) -> Option<String> {
  match value {
    Some(Value::String(s)) => Some(s),
    _ => None,
  }
}

fn timestamp(value: &Value) -> Option<DateTime<Utc>> {
  value.as_str()?.parse().ok()
}

fn role_token(value: &Value) -> Option<Role> {
  value.as_str()?.parse().ok()
}

fn is_string(value: &Value) -> Result<(), validator::ValidationError> {
  if value.is_string() {
    Ok(())
  } else {
    Err(Reason::NotAString.into())
  }
}

fn is_bool(value: &Value) -> Result<(), validator::ValidationError> {
  if value.is_boolean() {
    Ok(())
  } else {
    Err(Reason::NotABoolean.into())
  }
}

fn is_timestamp(value: &Value) -> Result<(), validator::ValidationError> {
  timestamp(value).map(|_| ()).ok_or_else(|| Reason::InvalidTimestamp.into())
}

fn is_role(value: &Value) -> Result<(), validator::ValidationError> {
  role_token(value).map(|_| ()).ok_or_else(|| Reason::UnknownRole.into())
}

fn timestamps_in_order(candidate: &UserCandidate) -> Result<(), validator::ValidationError> {
  let created = candidate.created_at.as_ref().and_then(timestamp);
  let updated = candidate.updated_at.as_ref().and_then(timestamp);

  match (created, updated) {
    (Some(created), Some(updated)) if created > updated => Err(Reason::CreatedAfterUpdated.into()),
    _ => Ok(()),
  }
}
