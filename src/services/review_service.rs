// src/services/review_service.rs

use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Review, ReviewForm};
use crate::state::AppState;

pub struct ReviewService;

impl ReviewService {
    /// Attach a review to an existing campground
    pub async fn create(
        state: &AppState,
        campground_id: Uuid,
        author_id: Uuid,
        form: ReviewForm,
    ) -> Result<Review, AppError> {
        let review = state
            .reviews
            .create(&form.into_new_review(campground_id, author_id)?)
            .await?;
        log::info!("Review {} added to campground {}", review.id, campground_id);
        Ok(review)
    }

    pub async fn delete(state: &AppState, campground_id: Uuid, review_id: Uuid) -> Result<(), AppError> {
        state.reviews.delete(campground_id, review_id).await?;
        log::info!("Review {} removed from campground {}", review_id, campground_id);
        Ok(())
    }
}
