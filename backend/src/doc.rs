//! OpenAPI documentation for the JSON API surface.
//!
//! Covers the `/api/v1/auth` endpoints; the form endpoints speak the
//! hypermedia envelope and stay outside the generated document. Swagger UI
//! serves the document in debug builds only.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::auth::{RegisterRequest, SessionResponse, SignInRequest};

/// Enrich the generated document with the session token schemes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session_token",
                "Session cookie issued at sign-in.",
            ))),
        );
    }
}

/// OpenAPI document for the JSON API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Roomboard API",
        description = "Session-authenticated household management."
    ),
    paths(
        crate::inbound::http::auth::sign_in,
        crate::inbound::http::auth::sign_out,
        crate::inbound::http::auth::register_account,
    ),
    components(schemas(Error, ErrorCode, SignInRequest, RegisterRequest, SessionResponse)),
    tags((name = "auth", description = "Session lifecycle"))
)]
pub struct ApiDoc;
