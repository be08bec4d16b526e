//! HTTP server assembly: shared state, routes, and middleware.

mod config;
mod state_builders;

pub use config::ServerConfig;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpRequest, HttpServer, Scope, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use rentease::Trace;
#[cfg(debug_assertions)]
use rentease::doc::ApiDoc;
use rentease::domain::Error;
use rentease::inbound::http::health::{HealthState, live, ready};
use rentease::inbound::http::state::HttpState;
use rentease::inbound::http::validation::json_config;
use rentease::inbound::http::{ApiResult, api_routes};
use state_builders::build_http_state;

/// Versioned REST surface.
fn api_scope() -> Scope {
    web::scope("/api/v1")
        .app_data(json_config())
        .configure(api_routes)
}

/// Unknown paths answer with the standard error payload.
async fn route_not_found(req: HttpRequest) -> ApiResult<actix_web::HttpResponse> {
    Err(Error::not_found(format!(
        "no route for {} {}",
        req.method(),
        req.path()
    )))
}

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(ready)
        .service(live)
        .service(api_scope());

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app.default_service(web::to(route_not_found))
}

/// Bind the RentEase HTTP server and flag it ready.
///
/// Handler state is built once here, so every worker shares one set of
/// repositories.
///
/// # Errors
/// Returns [`std::io::Error`] when the socket cannot be bound.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(build_http_state(&config));
    let worker_health = health_state.clone();

    let server = HttpServer::new(move || build_app(worker_health.clone(), http_state.clone()))
        .bind(config.bind_addr)?
        .run();

    health_state.mark_ready();
    Ok(server)
}
