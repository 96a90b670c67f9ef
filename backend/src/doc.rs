//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] generates the OpenAPI specification for the REST API,
//! registering every endpoint path, the request and response schemas, and
//! the bearer-token security scheme. Swagger UI serves the document in
//! debug builds only.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::Role;
use crate::inbound::http::categories::{
    CategoryListResponse, CategoryResponse, CreateCategoryRequest, UpdateCategoryRequest,
};
use crate::inbound::http::entries::{
    CreateEntryRequest, EntryListResponse, EntryResponse, UpdateEntryRequest,
};
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::status::StatusResponse;
use crate::inbound::http::users::{
    CredentialsRequest, LoginResponse, RegisterRequest, UserResponse,
};

/// Enrich the generated document with the bearer-token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                Http::builder()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by POST /v1/auth/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Ledger backend API",
        description = "Token-authenticated REST interface for user-scoped categories and entries."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::me,
        crate::inbound::http::categories::list,
        crate::inbound::http::categories::create,
        crate::inbound::http::categories::get,
        crate::inbound::http::categories::update,
        crate::inbound::http::categories::remove,
        crate::inbound::http::entries::list,
        crate::inbound::http::entries::create,
        crate::inbound::http::entries::get,
        crate::inbound::http::entries::update,
        crate::inbound::http::entries::remove,
        crate::inbound::http::status::status,
    ),
    components(schemas(
        Role,
        ErrorBody,
        RegisterRequest,
        CredentialsRequest,
        UserResponse,
        LoginResponse,
        CreateCategoryRequest,
        UpdateCategoryRequest,
        CategoryResponse,
        CategoryListResponse,
        CreateEntryRequest,
        UpdateEntryRequest,
        EntryResponse,
        EntryListResponse,
        StatusResponse,
    )),
    tags(
        (name = "auth", description = "Registration, login, and profile lookup"),
        (name = "categories", description = "Role-gated category administration"),
        (name = "entries", description = "Ownership-scoped entry management"),
        (name = "status", description = "Liveness probe")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn document_registers_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        for expected in [
            "/v1/auth/register",
            "/v1/auth/login",
            "/v1/auth/me",
            "/v1/categories",
            "/v1/categories/{id}",
            "/v1/entries",
            "/v1/entries/{id}",
            "/status",
        ] {
            assert!(paths.contains(&expected), "missing path: {expected}");
        }
    }

    #[rstest]
    fn document_registers_the_bearer_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("BearerToken"));
    }
}
