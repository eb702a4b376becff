// src/handlers/users.rs
// DOCUMENTATION: Registration, login and logout
// PURPOSE: The only handlers that change the session identity

use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;

use super::view::{redirect, render};
use crate::errors::{AppError, LOGIN_PATH};
use crate::middleware::{decode_body, validated, FormBody, RequestContext};
use crate::models::{LoginForm, RegisterForm};
use crate::services::AuthService;
use crate::state::AppState;

const AFTER_LOGIN: &str = "/campgrounds";

/// Address the login limiter keys on
/// Client-supplied forwarding headers count only when a trusted proxy sets them.
fn client_address(req: &HttpRequest, trust_proxy_headers: bool) -> String {
    if trust_proxy_headers {
        if let Some(forwarded) = req.connection_info().realip_remote_addr() {
            return forwarded.to_string();
        }
    }
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Same-site absolute path, never `//host` or a full URL
fn is_local_path(target: &str) -> bool {
    target.starts_with('/') && !target.starts_with("//") && !target.contains('\\')
}

/// GET /register
pub async fn register_form(ctx: RequestContext) -> HttpResponse {
    render("users/register", &ctx, json!({}))
}

/// POST /register
/// Creates the account and signs it in
pub async fn register(
    state: web::Data<AppState>,
    ctx: RequestContext,
    req: HttpRequest,
    body: FormBody<RegisterForm>,
) -> Result<HttpResponse, AppError> {
    state
        .login_limiter
        .check(&client_address(&req, state.config.trust_proxy_headers))?;
    let form = validated(body)?;

    let user = match AuthService::register(&state, form).await {
        Ok(user) => user,
        Err(AppError::ValidationFailed(message)) => {
            ctx.flash_error(message);
            return Ok(redirect("/register"));
        }
        Err(e) => return Err(e),
    };

    log::info!("Registered user {} ({})", user.username, user.id);
    ctx.log_in(user);
    ctx.flash_success("Welcome to Yelp Camp!");
    Ok(redirect(AFTER_LOGIN))
}

/// GET /login
pub async fn login_form(ctx: RequestContext) -> HttpResponse {
    render("users/login", &ctx, json!({}))
}

/// POST /login
/// DOCUMENTATION: Sends the user back to the page the login guard interrupted
pub async fn login(
    state: web::Data<AppState>,
    ctx: RequestContext,
    req: HttpRequest,
    body: FormBody<LoginForm>,
) -> Result<HttpResponse, AppError> {
    state
        .login_limiter
        .check(&client_address(&req, state.config.trust_proxy_headers))?;
    let form = decode_body(body)?;

    let user = match AuthService::authenticate(&state, &form.username, &form.password).await? {
        Some(user) => user,
        None => {
            ctx.flash_error("Password or username is incorrect");
            return Ok(redirect(LOGIN_PATH));
        }
    };

    let target = ctx
        .take_return_to()
        .filter(|target| is_local_path(target))
        .unwrap_or_else(|| AFTER_LOGIN.to_string());

    ctx.log_in(user);
    ctx.flash_success("welcome back!");
    Ok(redirect(&target))
}

/// GET /logout
pub async fn logout(ctx: RequestContext) -> HttpResponse {
    ctx.log_out();
    ctx.flash_success("Goodbye!");
    redirect(AFTER_LOGIN)
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/register", web::get().to(register_form))
        .route("/register", web::post().to(register))
        .route("/login", web::get().to(login_form))
        .route("/login", web::post().to(login))
        .route("/logout", web::get().to(logout));
}
