// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for entire application

use actix_web::{error::ResponseError, http::header, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Generic message shown for failures whose details must stay server-side
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong!";

/// Where unauthenticated requests are sent
pub const LOGIN_PATH: &str = "/login";

/// Application-specific error types
/// DOCUMENTATION: Closed set of failures raised by guards, handlers and stores
/// Each variant maps to one HTTP status code and one public message
#[derive(Error, Debug)]
pub enum AppError {
    #[error("You must be signed in first!")]
    AuthenticationRequired,

    #[error("{message}")]
    AuthorizationDenied { message: String, redirect: String },

    #[error("{0}")]
    ValidationFailed(String),

    #[error("{0}")]
    ResourceNotFound(String),

    #[error("Store failure: {0}")]
    UpstreamStoreFailure(String),

    #[error("External service failure: {0}")]
    ExternalService(String),

    #[error("Too many attempts, please try again later")]
    RateLimited,

    #[error("Unhandled failure: {0}")]
    Unhandled(String),
}

impl AppError {
    /// Ownership rejection that sends the user back to `redirect`
    pub fn denied(redirect: impl Into<String>) -> Self {
        AppError::AuthorizationDenied {
            message: "You do not have permission to do that!".to_string(),
            redirect: redirect.into(),
        }
    }

    /// Stable machine-readable code for the error body
    pub fn code(&self) -> &'static str {
        match self {
            AppError::AuthenticationRequired => "AUTHENTICATION_REQUIRED",
            AppError::AuthorizationDenied { .. } => "AUTHORIZATION_DENIED",
            AppError::ValidationFailed(_) => "VALIDATION_FAILED",
            AppError::ResourceNotFound(_) => "RESOURCE_NOT_FOUND",
            AppError::UpstreamStoreFailure(_) => "UPSTREAM_STORE_FAILURE",
            AppError::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
            AppError::RateLimited => "RATE_LIMITED",
            AppError::Unhandled(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to put in a response body
    pub fn public_message(&self) -> String {
        match self {
            AppError::UpstreamStoreFailure(_) | AppError::Unhandled(_) => {
                GENERIC_ERROR_MESSAGE.to_string()
            }
            AppError::ExternalService(_) => {
                "An external service is unavailable, please try again later".to_string()
            }
            other => other.to_string(),
        }
    }

    fn redirect(&self) -> Option<&str> {
        match self {
            AppError::AuthenticationRequired => Some(LOGIN_PATH),
            AppError::AuthorizationDenied { redirect, .. } => Some(redirect.as_str()),
            _ => None,
        }
    }
}

/// Convert AppError to HTTP response
/// DOCUMENTATION: Renders the uniform error view; server-side details only reach the log
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        if status.is_server_error() {
            log::error!("{} ({}): {}", self.code(), status.as_u16(), self);
        } else {
            log::debug!("{} ({}): {}", self.code(), status.as_u16(), self);
        }

        let mut body = json!({
            "error": {
                "code": self.code(),
                "status": status.as_u16(),
                "message": self.public_message(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }
        });
        if let Some(redirect) = self.redirect() {
            body["error"]["redirect"] = json!(redirect);
        }

        let mut response = HttpResponse::build(status);
        if let AppError::AuthenticationRequired = self {
            response.insert_header((header::LOCATION, LOGIN_PATH));
        }
        response.json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::AuthenticationRequired => StatusCode::SEE_OTHER,
            AppError::AuthorizationDenied { .. } => StatusCode::FORBIDDEN,
            AppError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            AppError::ResourceNotFound(_) => StatusCode::NOT_FOUND,
            AppError::UpstreamStoreFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ExternalService(_) => StatusCode::BAD_GATEWAY,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::Unhandled(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn render(err: AppError) -> (StatusCode, Option<String>, serde_json::Value) {
        let response = err.error_response();
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = to_bytes(response.into_body()).await.unwrap();
        (status, location, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_web::test]
    async fn store_failures_hide_details() {
        let (status, _, body) =
            render(AppError::UpstreamStoreFailure("connection refused on 10.0.0.3".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["message"], GENERIC_ERROR_MESSAGE);
        assert!(!body.to_string().contains("10.0.0.3"));
    }

    #[actix_web::test]
    async fn authentication_required_redirects_to_login() {
        let (status, location, body) = render(AppError::AuthenticationRequired).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some(LOGIN_PATH));
        assert_eq!(body["error"]["redirect"], LOGIN_PATH);
    }

    #[actix_web::test]
    async fn denial_carries_redirect_and_forbidden_status() {
        let (status, location, body) = render(AppError::denied("/campgrounds/abc")).await;
        assert!(location.is_none());
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["code"], "AUTHORIZATION_DENIED");
        assert_eq!(body["error"]["redirect"], "/campgrounds/abc");
        assert_eq!(
            body["error"]["message"],
            "You do not have permission to do that!"
        );
    }

    #[test]
    fn client_errors_keep_their_message() {
        let err = AppError::ValidationFailed("price must be at least 0".into());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.public_message(), "price must be at least 0");
        assert_eq!(
            AppError::ResourceNotFound("Page Not Found".into()).status_code(),
            StatusCode::NOT_FOUND
        );
    }
}
