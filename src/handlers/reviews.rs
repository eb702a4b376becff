// src/handlers/reviews.rs
// DOCUMENTATION: Review handlers, nested under /campgrounds/{id}

use actix_web::{web, HttpRequest, HttpResponse};
use uuid::Uuid;

use super::view::redirect;
use crate::errors::AppError;
use crate::middleware::{require_login, require_review_author, validated, FormBody, RequestContext};
use crate::models::ReviewForm;
use crate::services::ReviewService;
use crate::state::AppState;

/// POST /campgrounds/{id}/reviews
pub async fn create(
    state: web::Data<AppState>,
    ctx: RequestContext,
    req: HttpRequest,
    path: web::Path<Uuid>,
    body: FormBody<ReviewForm>,
) -> Result<HttpResponse, AppError> {
    let campground_id = path.into_inner();
    let user = require_login(&ctx, &req)?;
    let form = validated(body)?;

    ReviewService::create(&state, campground_id, user.id, form).await?;

    ctx.flash_success("Created new review!");
    Ok(redirect(&format!("/campgrounds/{}", campground_id)))
}

/// DELETE /campgrounds/{id}/reviews/{review_id}
pub async fn delete(
    state: web::Data<AppState>,
    ctx: RequestContext,
    req: HttpRequest,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, AppError> {
    let (campground_id, review_id) = path.into_inner();
    let user = require_login(&ctx, &req)?;
    require_review_author(&state, &ctx, &user, campground_id, review_id).await?;

    ReviewService::delete(&state, campground_id, review_id).await?;

    ctx.flash_success("Successfully deleted review");
    Ok(redirect(&format!("/campgrounds/{}", campground_id)))
}

/// Mounted inside the /campgrounds scope
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/{id}/reviews", web::post().to(create))
        .route("/{id}/reviews/{review_id}", web::delete().to(delete));
}
