use crate::entities::user::{PublicUser, User};

/// Copy of `user` fit to cross a trust boundary. The password is dropped, not nulled.
///
/// Only the `password` field is removed. If the same text also sits in another field,
/// for example a password equal to the username, it still appears there.
pub fn redact(user: &User) -> PublicUser {
  PublicUser {
    id: user.id.clone(),
    username: user.username.clone(),
    firstname: user.firstname.clone(),
    lastname: user.lastname.clone(),
    email: user.email.clone(),
    active: user.active,
    created_at: user.created_at,
    updated_at: user.updated_at,
    role: user.role,
  }
}

impl From<&User> for PublicUser {
  fn from(user: &User) -> Self {
    redact(user)
  }
}

impl From<User> for PublicUser {
  fn from(user: User) -> Self {
    let User {
      id,
      username,
      firstname,
      lastname,
      email,
      password: _,
      active,
      created_at,
      updated_at,
      role,
    } = user;

    Self {
      id,
      username,
      firstname,
      lastname,
      email,
      active,
      created_at,
      updated_at,
      role,
    }
  }
}

impl User {
  pub fn redact(&self) -> PublicUser {
    redact(self)
  }
}

#[cfg(test)]
mod tests {
  use serde_json::{json, Value};

  use super::*;
  use crate::validate::validate;

  fn contains_string(value: &Value, needle: &str) -> bool {
    match value {
      Value::String(s) => s.contains(needle),
      Value::Array(items) => items.iter().any(|v| contains_string(v, needle)),
      Value::Object(map) => map.iter().any(|(k, v)| k.contains(needle) || contains_string(v, needle)),
      _ => false,
    }
  }

  #[test]
  fn test_redacted_output_has_no_password() {
    let user = validate(&json!({
      "id": "u1",
      "username": "jdoe",
      "firstname": "Jane",
      "lastname": "Doe",
      "email": "j@x.com",
      "password": "Tr0ub4dor&3",
      "active": true,
      "role": "admin"
    }))
    .unwrap();

    for public in [user.redact(), PublicUser::from(user.clone())] {
      let value = serde_json::to_value(&public).unwrap();
      assert!(value.get("password").is_none());
      assert!(!contains_string(&value, "Tr0ub4dor&3"));
      assert!(!format!("{:?}", public).contains("Tr0ub4dor&3"));
    }
  }

  #[test]
  fn test_redact_without_password_is_unchanged() {
    let candidate = json!({
      "id": "u1",
      "username": "jdoe",
      "firstname": "Jane",
      "lastname": "Doe",
      "email": "j@x.com",
      "active": true
    });
    let user = validate(&candidate).unwrap();

    assert_eq!(serde_json::to_value(user.redact()).unwrap(), candidate);
  }

  #[test]
  fn test_redact_keeps_every_other_field() {
    let user = validate(&json!({
      "id": "u9",
      "username": "root",
      "firstname": "Ada",
      "lastname": "Lovelace",
      "email": "ada@example.com",
      "password": "x",
      "active": false,
      "createdAt": "2024-01-01T00:00:00Z",
      "updatedAt": "2024-02-01T00:00:00Z",
      "role": "admin"
    }))
    .unwrap();

    let public = user.redact();
    assert_eq!(public.id(), user.id());
    assert_eq!(public.email, user.email);
    assert_eq!(public.active, user.active);
    assert_eq!(public.created_at, user.created_at);
    assert_eq!(public.updated_at, user.updated_at);
    assert_eq!(public.role, user.role);
  }

  #[test]
  fn test_redact_leaves_other_fields_alone() {
    let user = validate(&json!({
      "id": "u1",
      "username": "jdoe",
      "firstname": "Jane",
      "lastname": "Doe",
      "email": "j@x.com",
      "password": "jdoe",
      "active": true
    }))
    .unwrap();

    let value = serde_json::to_value(user.redact()).unwrap();
    assert!(value.get("password").is_none());
    assert_eq!(value["username"], json!("jdoe"));
  }

  #[test]
  fn test_public_user_rejects_password_key() {
    let res = serde_json::from_value::<PublicUser>(json!({
      "id": "u1",
      "username": "jdoe",
      "firstname": "Jane",
      "lastname": "Doe",
      "email": "j@x.com",
      "password": "s3cret",
      "active": true
    }));
    assert!(res.is_err());
  }
}
