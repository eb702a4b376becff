// src/handlers/home.rs

use actix_web::{web, HttpResponse};
use serde_json::json;

use super::view::render;
use crate::errors::AppError;
use crate::middleware::RequestContext;

/// GET /
pub async fn home(ctx: RequestContext) -> HttpResponse {
    render("home", &ctx, json!({}))
}

/// Fallback for unmatched routes
pub async fn not_found() -> Result<HttpResponse, AppError> {
    Err(AppError::ResourceNotFound("Page Not Found".to_string()))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home));
}
