//! The user record exchanged between storage, authentication, UI and API clients,
//! with the validation, redaction and wire codec that guard its boundaries.

pub mod entities;
pub mod error;
pub mod redact;
pub mod schema;
pub mod validate;
pub mod wire;

pub use entities::user::{NewUser, Password, PublicUser, Role, User, UserChanges, UserId};
pub use error::{ErrorReport, ModelError, ModelResult, Reason, ValidationError, ValidationErrors};
pub use redact::redact;
pub use validate::validate;
