// src/app.rs
// DOCUMENTATION: Application factory shared by the server and the test harness

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::{from_fn, Compress, Logger};
use actix_web::{web, App, Error};

use crate::errors::AppError;
use crate::handlers;
use crate::middleware::{method_override, session_middleware};
use crate::state::AppState;

/// Build the application
/// DOCUMENTATION: Middleware runs Logger -> Compress -> method override -> session -> routes
pub fn build_app(
    state: web::Data<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        // Undecodable ids are reported like any other unknown resource
        .app_data(web::PathConfig::default().error_handler(|err, req| {
            log::debug!("Bad path parameter on {}: {}", req.path(), err);
            AppError::ResourceNotFound("Page Not Found".to_string()).into()
        }))
        .wrap(from_fn(session_middleware))
        .wrap(from_fn(method_override))
        .wrap(Compress::default())
        .wrap(Logger::default())
        .configure(handlers::home_config)
        .configure(handlers::health_config)
        .configure(handlers::users_config)
        .configure(handlers::campgrounds_config)
        .default_service(web::to(handlers::not_found))
}
