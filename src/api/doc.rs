//! OpenAPI document for the roster API.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::middleware::{Scope, UsersEdit, UsersView, WILDCARD_SCOPE};

pub const USER_TAG: &str = "User";
pub const HEALTH_TAG: &str = "Health";

/// Name the handlers reference in their `security(...)` attributes.
pub const BEARER_SCHEME: &str = "bearerAuth";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "roster-rs",
        description = "User management API. Every /api/users route except OPTIONS needs a bearer token whose `scopes` claim grants the route's scope.",
    ),
    modifiers(&BearerScopes),
    components(schemas(crate::api::dto::ErrorResponse)),
    tags(
        (name = USER_TAG, description = "Search, create, read, update and delete users"),
        (name = HEALTH_TAG, description = "Liveness probe"),
    )
)]
pub struct ApiDoc;

/// Registers the bearer scheme and lists the scopes it can carry.
pub struct BearerScopes;

impl Modify for BearerScopes {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let description = format!(
            "HS256 JWT. `{}` reads a user, `{}` covers everything else, `{}` grants both.",
            UsersView::NAME,
            UsersEdit::NAME,
            WILDCARD_SCOPE
        );

        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(description))
                    .build(),
            ),
        );
    }
}
