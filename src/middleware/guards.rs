// src/middleware/guards.rs
// DOCUMENTATION: Route guards for login, request validation and ownership
// PURPOSE: Each guard either lets the request through or short-circuits with an AppError
// Handlers call them in the order login -> validation -> ownership.

use actix_web::{web, Either, HttpRequest};
use serde_json::Value;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use super::{HtmlForm, RequestContext};
use crate::errors::AppError;
use crate::models::User;
use crate::services::CAMPGROUND_NOT_FOUND;
use crate::state::AppState;

pub const SIGN_IN_REQUIRED: &str = "You must be signed in first!";
pub const PERMISSION_DENIED: &str = "You do not have permission to do that!";
pub const REVIEW_NOT_FOUND: &str = "Cannot find that review!";

/// JSON or urlencoded body; decoding errors are held back until validation
pub type FormBody<T> = Result<Either<web::Json<T>, HtmlForm<T>>, actix_web::Error>;

/// Login guard
/// DOCUMENTATION: Remembers the original GET target so login can send the user back
pub fn require_login(ctx: &RequestContext, req: &HttpRequest) -> Result<User, AppError> {
    if let Some(user) = ctx.current_user() {
        return Ok(user);
    }

    if req.method() == actix_web::http::Method::GET {
        let target = match req.query_string() {
            "" => req.path().to_string(),
            query => format!("{}?{}", req.path(), query),
        };
        ctx.set_return_to(target);
    }
    ctx.flash_error(SIGN_IN_REQUIRED);
    log::debug!("Unauthenticated {} {}", req.method(), req.path());
    Err(AppError::AuthenticationRequired)
}

pub fn decode_body<T>(body: FormBody<T>) -> Result<T, AppError> {
    match body {
        Ok(Either::Left(json)) => Ok(json.into_inner()),
        Ok(Either::Right(form)) => Ok(form.into_inner()),
        Err(e) => {
            log::debug!("Undecodable request body: {}", e);
            Err(AppError::ValidationFailed("Request body is malformed".to_string()))
        }
    }
}

/// Validation guard
/// DOCUMENTATION: All violations are reported together, sorted by field path
pub fn validate_body<T: Validate>(body: &T) -> Result<(), AppError> {
    body.validate()
        .map_err(|errors| AppError::ValidationFailed(describe_violations(&errors)))
}

/// Decode then validate
pub fn validated<T: Validate>(body: FormBody<T>) -> Result<T, AppError> {
    let value = decode_body(body)?;
    validate_body(&value)?;
    Ok(value)
}

pub fn describe_violations(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();
    collect_violations(errors, None, &mut messages);
    messages.sort();
    messages.join(", ")
}

fn collect_violations(errors: &ValidationErrors, prefix: Option<&str>, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = match prefix {
            Some(prefix) => format!("{}.{}", prefix, field),
            None => field.to_string(),
        };
        match kind {
            ValidationErrorsKind::Field(violations) => {
                out.extend(violations.iter().map(|v| describe(&path, v)));
            }
            ValidationErrorsKind::Struct(inner) => collect_violations(inner, Some(&path), out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_violations(inner, Some(&format!("{}[{}]", path, index)), out);
                }
            }
        }
    }
}

fn describe(field: &str, violation: &ValidationError) -> String {
    if let Some(message) = &violation.message {
        return format!("{} {}", field, message);
    }

    let param = |name: &str| violation.params.get(name);
    match &*violation.code {
        "required" => format!("{} is required", field),
        "range" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => {
                format!("{} must be between {} and {}", field, number(min), number(max))
            }
            (Some(min), None) => format!("{} must be at least {}", field, number(min)),
            (None, Some(max)) => format!("{} must be at most {}", field, number(max)),
            (None, None) => format!("{} is out of range", field),
        },
        "length" => {
            let len = param("value")
                .and_then(Value::as_str)
                .map(|s| s.chars().count())
                .unwrap_or(0);
            let min = param("min").and_then(Value::as_u64);
            match (len, min) {
                (0, _) => format!("{} must not be empty", field),
                (len, Some(min)) if (len as u64) < min => {
                    format!("{} must be at least {} characters", field, min)
                }
                _ => match param("max").and_then(Value::as_u64) {
                    Some(max) => format!("{} must be at most {} characters", field, max),
                    None => format!("{} has an invalid length", field),
                },
            }
        }
        "email" => format!("{} must be a valid email", field),
        "url" => format!("{} must be a valid URL", field),
        "no_html" => format!("{} must not include HTML!", field),
        "coordinates" => format!("{} must be [longitude, latitude]", field),
        "finite" => format!("{} must be a finite number", field),
        code => format!("{} is invalid ({})", field, code),
    }
}

/// 0.0 prints as 0
fn number(value: &Value) -> String {
    match value.as_f64() {
        Some(n) if n.fract() == 0.0 => format!("{}", n as i64),
        Some(n) => n.to_string(),
        None => value.to_string(),
    }
}

/// Ownership guard for campgrounds
/// DOCUMENTATION: A missing campground is reported before any author comparison
pub async fn require_campground_author(
    state: &AppState,
    ctx: &RequestContext,
    user: &User,
    campground_id: Uuid,
) -> Result<(), AppError> {
    let author = state
        .campgrounds
        .author_of(campground_id)
        .await?
        .ok_or_else(|| AppError::ResourceNotFound(CAMPGROUND_NOT_FOUND.to_string()))?;

    if author != user.id {
        log::warn!("User {} denied on campground {}", user.id, campground_id);
        ctx.flash_error(PERMISSION_DENIED);
        return Err(AppError::denied(format!("/campgrounds/{}", campground_id)));
    }
    Ok(())
}

/// Ownership guard for reviews, scoped to their campground
pub async fn require_review_author(
    state: &AppState,
    ctx: &RequestContext,
    user: &User,
    campground_id: Uuid,
    review_id: Uuid,
) -> Result<(), AppError> {
    let author = state
        .reviews
        .author_of(campground_id, review_id)
        .await?
        .ok_or_else(|| AppError::ResourceNotFound(REVIEW_NOT_FOUND.to_string()))?;

    if author != user.id {
        log::warn!("User {} denied on review {}", user.id, review_id);
        ctx.flash_error(PERMISSION_DENIED);
        return Err(AppError::denied(format!("/campgrounds/{}", campground_id)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CampgroundForm, RegisterForm, ReviewForm};
    use crate::testing::sample_form;

    fn violations<T: Validate>(value: &T) -> String {
        match validate_body(value) {
            Err(AppError::ValidationFailed(message)) => message,
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn reports_every_violation_sorted() {
        let form = CampgroundForm {
            title: Some("Ridge".into()),
            price: Some(-5.0),
            ..Default::default()
        };
        assert_eq!(
            violations(&form),
            "description is required, location is required, price must be at least 0"
        );
    }

    #[test]
    fn rating_bounds_and_markup() {
        let review = ReviewForm {
            body: Some("<b>wow</b>".into()),
            rating: Some(6),
        };
        assert_eq!(
            violations(&review),
            "body must not include HTML!, rating must be between 1 and 5"
        );
    }

    #[test]
    fn empty_and_short_strings() {
        let form = RegisterForm {
            username: String::new(),
            email: "falcon@example.com".into(),
            password: "abc".into(),
        };
        assert_eq!(
            violations(&form),
            "password must be at least 6 characters, username must not be empty"
        );
    }

    #[test]
    fn nested_image_errors_carry_their_index() {
        let mut form = sample_form("Ridge");
        form.images = vec![crate::models::Image {
            url: "not a url".into(),
            filename: "YelpCamp/x".into(),
        }];
        assert_eq!(violations(&form), "images[0].url must be a valid URL");
    }

    #[test]
    fn non_finite_price_is_described() {
        let form = CampgroundForm {
            price: Some(f64::INFINITY),
            ..sample_form("Ridge")
        };
        assert_eq!(violations(&form), "price must be a finite number");
    }

    #[test]
    fn valid_form_passes() {
        assert!(validate_body(&sample_form("Ridge")).is_ok());
    }

    #[test]
    fn undecodable_body_is_a_validation_failure() {
        let body: FormBody<ReviewForm> =
            Err(actix_web::error::ErrorBadRequest("expected value at line 1"));
        assert!(matches!(decode_body(body), Err(AppError::ValidationFailed(_))));
    }
}
