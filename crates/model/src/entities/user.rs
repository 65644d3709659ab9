use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretBox};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use utoipa::ToSchema;

/// Opaque user identifier. Never parsed or decomposed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, ToSchema)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
  pub fn new(id: impl Into<String>) -> Self {
    Self(id.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for UserId {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<String> for UserId {
  fn from(id: String) -> Self {
    Self(id)
  }
}

impl From<&str> for UserId {
  fn from(id: &str) -> Self {
    Self(id.to_owned())
  }
}

/// Credential in transit. The value only leaves this type through the wire codec.
pub struct Password(SecretBox<String>);

impl Password {
  pub fn new(plain: impl Into<String>) -> Self {
    Self(SecretBox::new(Box::new(plain.into())))
  }

  pub fn expose(&self) -> &str {
    self.0.expose_secret()
  }
}

impl Clone for Password {
  fn clone(&self) -> Self {
    Self::new(self.expose())
  }
}

impl PartialEq for Password {
  fn eq(&self, other: &Self) -> bool {
    self.expose() == other.expose()
  }
}

impl Eq for Password {}

impl fmt::Debug for Password {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.write_str("Password([REDACTED])")
  }
}

impl Serialize for Password {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(self.expose())
  }
}

impl<'de> Deserialize<'de> for Password {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    String::deserialize(deserializer).map(Password::new)
  }
}

impl From<String> for Password {
  fn from(plain: String) -> Self {
    Self::new(plain)
  }
}

impl From<&str> for Password {
  fn from(plain: &str) -> Self {
    Self::new(plain)
  }
}

/// Authorization tier. An absent role is always read as [`Role::User`].
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  #[default]
  User,
  Admin,
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      Role::User => write!(f, "user"),
      Role::Admin => write!(f, "admin"),
    }
  }
}

impl FromStr for Role {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "user" => Ok(Role::User),
      "admin" => Ok(Role::Admin),
      _ => Err(format!("'{}' is not a valid role", s)),
    }
  }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase", try_from = "crate::validate::UserCandidate")]
pub struct User {
  pub(crate) id: UserId,
  pub username: String,
  pub firstname: String,
  pub lastname: String,
  pub email: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  #[schema(value_type = Option<String>, format = Password, write_only)]
  pub password: Option<Password>,
  pub active: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub created_at: Option<DateTime<Utc>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub updated_at: Option<DateTime<Utc>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub role: Option<Role>,
}

impl User {
  pub fn id(&self) -> &UserId {
    &self.id
  }

  pub fn effective_role(&self) -> Role {
    self.role.unwrap_or_default()
  }

  pub fn is_admin(&self) -> bool {
    self.effective_role() == Role::Admin
  }

  /// Removes the credential once an external collaborator has consumed it.
  pub fn take_password(&mut self) -> Option<Password> {
    self.password.take()
  }

  /// Overwrites the fields present in `changes`. Identity and timestamps are left alone.
  pub fn apply(&mut self, changes: UserChanges) {
    let UserChanges {
      username,
      firstname,
      lastname,
      email,
      password,
      active,
      role,
    } = changes;

    if let Some(username) = username {
      self.username = username;
    }
    if let Some(firstname) = firstname {
      self.firstname = firstname;
    }
    if let Some(lastname) = lastname {
      self.lastname = lastname;
    }
    if let Some(email) = email {
      self.email = email;
    }
    if let Some(password) = password {
      self.password = Some(password);
    }
    if let Some(active) = active {
      self.active = active;
    }
    if let Some(role) = role {
      self.role = Some(role);
    }
  }
}

/// User as shown across a trust boundary. There is no password field to leak.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase", try_from = "crate::validate::UserCandidate")]
pub struct PublicUser {
  pub(crate) id: UserId,
  pub username: String,
  pub firstname: String,
  pub lastname: String,
  pub email: String,
  pub active: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub created_at: Option<DateTime<Utc>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub updated_at: Option<DateTime<Utc>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub role: Option<Role>,
}

impl PublicUser {
  pub fn id(&self) -> &UserId {
    &self.id
  }

  pub fn effective_role(&self) -> Role {
    self.role.unwrap_or_default()
  }
}

/// Creation payload. Identity and timestamps belong to the storage layer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewUser {
  pub username: String,
  pub firstname: String,
  pub lastname: String,
  pub email: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  #[schema(value_type = Option<String>, format = Password, write_only)]
  pub password: Option<Password>,
  pub active: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub role: Option<Role>,
}

impl NewUser {
  pub fn into_user(self, id: impl Into<UserId>) -> User {
    User {
      id: id.into(),
      username: self.username,
      firstname: self.firstname,
      lastname: self.lastname,
      email: self.email,
      password: self.password,
      active: self.active,
      created_at: None,
      updated_at: None,
      role: self.role,
    }
  }
}

/// Update payload. Every field is optional and there is no `id`.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserChanges {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub username: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub firstname: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub lastname: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub email: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  #[schema(value_type = Option<String>, format = Password, write_only)]
  pub password: Option<Password>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub active: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub role: Option<Role>,
}
