// src/models/review.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::fields::trimmed_opt;
use super::validators::no_html;
use super::UserSummary;
use crate::errors::AppError;

/// Review left by a user on a campground
#[derive(Debug, Clone)]
pub struct Review {
    pub id: Uuid,
    pub campground_id: Uuid,
    pub body: String,
    pub rating: i32,
    pub author_id: Uuid,
    pub author_username: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a review
#[derive(Debug, Clone)]
pub struct NewReview {
    pub campground_id: Uuid,
    pub body: String,
    pub rating: i32,
    pub author_id: Uuid,
}

/// Request DTO for POST /campgrounds/{id}/reviews
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ReviewForm {
    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(required, length(min = 1, max = 5000), custom = "no_html")]
    pub body: Option<String>,

    #[serde(default)]
    #[validate(required, range(min = 1, max = 5))]
    pub rating: Option<i32>,
}

impl ReviewForm {
    pub fn into_new_review(self, campground_id: Uuid, author_id: Uuid) -> Result<NewReview, AppError> {
        match (self.body, self.rating) {
            (Some(body), Some(rating)) => Ok(NewReview {
                campground_id,
                body,
                rating,
                author_id,
            }),
            _ => Err(AppError::ValidationFailed(
                "review is missing required fields".to_string(),
            )),
        }
    }
}

/// Review response DTO exposed via API
#[derive(Debug, Clone, Serialize)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub body: String,
    pub rating: i32,
    pub author: UserSummary,
    pub created_at: DateTime<Utc>,
}

impl Review {
    /// Convert database Review into API response
    pub fn to_response(&self) -> ReviewResponse {
        ReviewResponse {
            id: self.id,
            body: self.body.clone(),
            rating: self.rating,
            author: UserSummary {
                id: self.author_id,
                username: self.author_username.clone(),
            },
            created_at: self.created_at,
        }
    }
}
