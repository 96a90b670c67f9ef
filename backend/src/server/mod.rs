//! Server construction and middleware wiring.

mod config;

pub use config::{ConfigError, ServerConfig};

use std::sync::Arc;

use actix_web::body::BoxBody;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use crate::auth::TokenService;
use crate::domain::{CategoryService, EntryService, Error};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{categories, entries, status, users};
use crate::middleware::ApiKeyGuard;
use crate::outbound::persistence::MemoryStore;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Assemble the dependency bundle over a fresh in-process store.
#[must_use]
pub fn build_state(config: &ServerConfig) -> web::Data<HttpState> {
    let store = Arc::new(MemoryStore::default());
    web::Data::new(HttpState {
        users: store.clone(),
        categories: CategoryService::new(store.clone()),
        entries: EntryService::new(store.clone(), store),
        tokens: Arc::new(TokenService::new(
            &config.jwt_secret,
            config.token_lifetime,
        )),
    })
}

/// Assemble the application: routes, perimeter gate, and body handling.
///
/// Exposed so integration tests drive the exact app the binary serves.
pub fn build_app(
    state: web::Data<HttpState>,
    api_key: Option<String>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<BoxBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    // Unreadable JSON bodies become the uniform 400 instead of actix's
    // default error text.
    let json_config = web::JsonConfig::default()
        .error_handler(|_, _| Error::invalid_request("Invalid request body").into());

    let api = web::scope("/v1")
        .service(users::register)
        .service(users::login)
        .service(users::me)
        .service(categories::list)
        .service(categories::create)
        .service(categories::get)
        .service(categories::update)
        .service(categories::remove)
        .service(entries::list)
        .service(entries::create)
        .service(entries::get)
        .service(entries::update)
        .service(entries::remove);

    let app = App::new()
        .app_data(state)
        .app_data(json_config)
        .wrap(ApiKeyGuard::new(api_key))
        .service(api)
        .service(status::status);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server from the provided configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(config: ServerConfig) -> std::io::Result<Server> {
    let state = build_state(&config);
    let api_key = config.api_key.clone();
    let server = HttpServer::new(move || build_app(state.clone(), api_key.clone()))
        .bind(config.bind_addr)?
        .run();
    Ok(server)
}
