// src/handlers/health.rs
// DOCUMENTATION: Health check handler
// PURPOSE: Simple endpoint to verify service status

use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use crate::config::StoreBackend;
use crate::state::AppState;

pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store = match state.config.store_backend {
        StoreBackend::Postgres => "postgres",
        StoreBackend::Memory => "memory",
    };

    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": "yelpcamp",
        "version": env!("CARGO_PKG_VERSION"),
        "store": store,
        "geocoding": state.geocoder.is_some()
    }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}
