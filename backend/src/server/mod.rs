//! Server construction and middleware wiring.

mod config;
mod settings;
mod state_builders;

pub use config::ServerConfig;
pub use settings::ServerSettings;

use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use payments::RequestTracing;
use payments::doc::ApiDoc;
use payments::inbound::http::error::json_error_handler;
use payments::inbound::http::payments::{
    create_payment, delete_payment, load_payment, search_payments, update_payment,
};
use payments::inbound::http::state::HttpState;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn build_app(
    http_state: web::Data<HttpState>,
    docs: bool,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/v1")
        .service(search_payments)
        .service(load_payment)
        .service(create_payment)
        .service(update_payment)
        .service(delete_payment);

    let app = App::new()
        .app_data(http_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(RequestTracing)
        .service(api);

    if docs {
        app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()))
    } else {
        app
    }
}

/// Construct an Actix HTTP server from `config`.
///
/// Actix stops accepting connections on SIGINT or SIGTERM and gives in-flight
/// requests the configured shutdown timeout to finish.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(config: ServerConfig) -> std::io::Result<Server> {
    let http_state = web::Data::new(build_http_state(&config.db_pool));
    let ServerConfig {
        bind_addr,
        db_pool: _,
        docs,
        shutdown_timeout_secs,
    } = config;

    let server = HttpServer::new(move || build_app(http_state.clone(), docs))
        .shutdown_timeout(shutdown_timeout_secs)
        .bind(bind_addr)?
        .run();
    Ok(server)
}
