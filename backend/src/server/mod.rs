//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer};

use record_service::Trace;
#[cfg(debug_assertions)]
use record_service::doc::ApiDoc;
use record_service::inbound::http::configure;
use record_service::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

pub(crate) fn build_app(
    http_state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new().wrap(Trace);

    // Docs sit outside the bearer-guarded scope, so they go first.
    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app.configure(configure(http_state))
}

/// Construct an Actix HTTP server from a prepared [`ServerConfig`].
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(config: ServerConfig) -> std::io::Result<Server> {
    let ServerConfig {
        bind_addr,
        shutdown_grace,
        http_state,
    } = config;

    let server = HttpServer::new(move || build_app(http_state.clone()))
        .shutdown_timeout(shutdown_grace.as_secs())
        .bind(bind_addr)?
        .run();

    Ok(server)
}
