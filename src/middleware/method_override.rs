// src/middleware/method_override.rs
// DOCUMENTATION: Lets HTML forms reach PUT/PATCH/DELETE routes
// POST /campgrounds/{id}?_method=DELETE is routed as DELETE /campgrounds/{id}

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::Method;
use actix_web::middleware::Next;
use actix_web::{web, Error};
use std::collections::HashMap;

pub async fn method_override(
    mut req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    if req.method() == Method::POST {
        if let Some(method) = override_target(req.query_string()) {
            log::debug!("Method override: POST {} -> {}", req.path(), method);
            req.head_mut().method = method;
        }
    }
    next.call(req).await
}

/// Only PUT, PATCH and DELETE may be requested
fn override_target(query: &str) -> Option<Method> {
    let params = web::Query::<HashMap<String, String>>::from_query(query).ok()?;
    match params.get("_method")?.to_ascii_uppercase().as_str() {
        "PUT" => Some(Method::PUT),
        "PATCH" => Some(Method::PATCH),
        "DELETE" => Some(Method::DELETE),
        _ => None,
    }
}
