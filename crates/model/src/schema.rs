use utoipa::OpenApi;

use crate::entities::user::{NewUser, PublicUser, Role, User, UserChanges, UserId};

const ACCOUNTS_TAG: &str = "accounts";

#[derive(OpenApi)]
#[openapi(
  tags(
    (name = ACCOUNTS_TAG, description = "User record shapes shared by the UI and API clients")
  ),
  components(schemas(UserId, Role, User, PublicUser, NewUser, UserChanges))
)]
struct ApiDoc;

/// OpenAPI document describing every user shape.
pub fn openapi() -> utoipa::openapi::OpenApi {
  ApiDoc::openapi()
}
