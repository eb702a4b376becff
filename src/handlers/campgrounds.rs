// src/handlers/campgrounds.rs
// DOCUMENTATION: HTTP handlers for campground listings
// PURPOSE: Wire guards and CampgroundService into routes

use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use super::view::{redirect, render};
use crate::errors::AppError;
use crate::middleware::{require_campground_author, require_login, validated, FormBody, RequestContext};
use crate::models::CampgroundForm;
use crate::services::CampgroundService;
use crate::state::AppState;

/// GET /campgrounds
pub async fn index(
    state: web::Data<AppState>,
    ctx: RequestContext,
) -> Result<HttpResponse, AppError> {
    let campgrounds = CampgroundService::list(&state).await?;
    Ok(render("campgrounds/index", &ctx, json!({ "campgrounds": campgrounds })))
}

/// GET /campgrounds/map
/// GeoJSON for the cluster map
pub async fn map(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let collection = CampgroundService::map(&state).await?;
    Ok(HttpResponse::Ok().json(collection))
}

/// GET /campgrounds/new
pub async fn new_form(ctx: RequestContext, req: HttpRequest) -> Result<HttpResponse, AppError> {
    require_login(&ctx, &req)?;
    Ok(render("campgrounds/new", &ctx, json!({})))
}

/// POST /campgrounds
pub async fn create(
    state: web::Data<AppState>,
    ctx: RequestContext,
    req: HttpRequest,
    body: FormBody<CampgroundForm>,
) -> Result<HttpResponse, AppError> {
    let user = require_login(&ctx, &req)?;
    let form = validated(body)?;

    let campground = CampgroundService::create(&state, user.id, &form).await?;

    ctx.flash_success("Successfully made a new campground!");
    Ok(redirect(&format!("/campgrounds/{}", campground.id)))
}

/// GET /campgrounds/{id}
pub async fn show(
    state: web::Data<AppState>,
    ctx: RequestContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let detail = CampgroundService::show(&state, path.into_inner()).await?;
    Ok(render("campgrounds/show", &ctx, json!({ "campground": detail })))
}

/// GET /campgrounds/{id}/edit
pub async fn edit_form(
    state: web::Data<AppState>,
    ctx: RequestContext,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let user = require_login(&ctx, &req)?;
    require_campground_author(&state, &ctx, &user, id).await?;

    let campground = CampgroundService::find(&state, id).await?;
    Ok(render(
        "campgrounds/edit",
        &ctx,
        json!({ "campground": campground.to_response() }),
    ))
}

/// PUT or PATCH /campgrounds/{id}
pub async fn update(
    state: web::Data<AppState>,
    ctx: RequestContext,
    req: HttpRequest,
    path: web::Path<Uuid>,
    body: FormBody<CampgroundForm>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let user = require_login(&ctx, &req)?;
    let form = validated(body)?;
    require_campground_author(&state, &ctx, &user, id).await?;

    CampgroundService::update(&state, id, &form).await?;

    ctx.flash_success("Successfully updated campground!");
    Ok(redirect(&format!("/campgrounds/{}", id)))
}

/// DELETE /campgrounds/{id}
pub async fn delete(
    state: web::Data<AppState>,
    ctx: RequestContext,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let user = require_login(&ctx, &req)?;
    require_campground_author(&state, &ctx, &user, id).await?;

    CampgroundService::delete(&state, id).await?;

    ctx.flash_success("Successfully deleted campground");
    Ok(redirect("/campgrounds"))
}

/// Configure campground routes
/// The literal segments are registered before `/{id}`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/campgrounds")
            .route("", web::get().to(index))
            .route("", web::post().to(create))
            .route("/map", web::get().to(map))
            .route("/new", web::get().to(new_form))
            .route("/{id}", web::get().to(show))
            .route("/{id}", web::put().to(update))
            .route("/{id}", web::patch().to(update))
            .route("/{id}", web::delete().to(delete))
            .route("/{id}/edit", web::get().to(edit_form))
            .configure(super::reviews::config),
    );
}
