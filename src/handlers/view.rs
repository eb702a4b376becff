// src/handlers/view.rs
// DOCUMENTATION: JSON view model shared by every page handler

use actix_web::{http::header, HttpResponse};
use serde_json::{json, Value};

use crate::middleware::RequestContext;

/// Render `view` with the request locals merged under `data`
pub fn render(view: &str, ctx: &RequestContext, data: Value) -> HttpResponse {
    let locals = ctx.locals();
    let mut body = json!({
        "view": view,
        "current_user": locals.current_user,
        "success": locals.success,
        "error": locals.error,
    });

    if let (Value::Object(target), Value::Object(extra)) = (&mut body, data) {
        target.extend(extra);
    }
    HttpResponse::Ok().json(body)
}

/// 303 so the browser follows up with a GET
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}
