// src/db/review_repository.rs
// DOCUMENTATION: Review database operations
// PURPOSE: Handle CRUD operations for campground reviews

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::repository::{store_error, PgStore, ReviewRepository};
use crate::errors::AppError;
use crate::models::{NewReview, Review};

#[derive(Debug, FromRow)]
struct ReviewRow {
    id: Uuid,
    campground_id: Uuid,
    body: String,
    rating: i32,
    author_id: Uuid,
    author_username: String,
    created_at: DateTime<Utc>,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Review {
            id: row.id,
            campground_id: row.campground_id,
            body: row.body,
            rating: row.rating,
            author_id: row.author_id,
            author_username: row.author_username,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl ReviewRepository for PgStore {
    async fn list_for_campground(&self, campground_id: Uuid) -> Result<Vec<Review>, AppError> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            r#"
            SELECT r.id, r.campground_id, r.body, r.rating, r.author_id,
                   u.username AS author_username, r.created_at
            FROM reviews r
            JOIN users u ON u.id = r.author_id
            WHERE r.campground_id = $1
            ORDER BY r.created_at ASC
            "#,
        )
        .bind(campground_id)
        .fetch_all(self.pool())
        .await
        .map_err(|e| {
            log::error!("Failed to fetch reviews for campground {}: {}", campground_id, e);
            AppError::UpstreamStoreFailure(format!("Fetch reviews failed: {}", e))
        })?;

        Ok(rows.into_iter().map(Review::from).collect())
    }

    async fn author_of(&self, campground_id: Uuid, review_id: Uuid) -> Result<Option<Uuid>, AppError> {
        let author = sqlx::query_as::<_, (Uuid,)>(
            "SELECT author_id FROM reviews WHERE id = $1 AND campground_id = $2",
        )
        .bind(review_id)
        .bind(campground_id)
        .fetch_optional(self.pool())
        .await
        .map_err(store_error("Fetch review author"))?;

        Ok(author.map(|(author_id,)| author_id))
    }

    async fn create(&self, review: &NewReview) -> Result<Review, AppError> {
        // INSERT ... SELECT yields no row when the campground is gone
        let row = sqlx::query_as::<_, ReviewRow>(
            r#"
            WITH inserted AS (
                INSERT INTO reviews (id, campground_id, body, rating, author_id, created_at)
                SELECT $1, c.id, $3, $4, $5, NOW()
                FROM campgrounds c
                WHERE c.id = $2
                RETURNING *
            )
            SELECT i.id, i.campground_id, i.body, i.rating, i.author_id,
                   u.username AS author_username, i.created_at
            FROM inserted i
            JOIN users u ON u.id = i.author_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(review.campground_id)
        .bind(&review.body)
        .bind(review.rating)
        .bind(review.author_id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| {
            log::error!("Failed to create review: {}", e);
            AppError::UpstreamStoreFailure(format!("Create review failed: {}", e))
        })?
        .ok_or_else(|| AppError::ResourceNotFound("Cannot find that campground!".to_string()))?;

        log::info!("Created review {} on campground {}", row.id, row.campground_id);
        Ok(row.into())
    }

    async fn delete(&self, campground_id: Uuid, review_id: Uuid) -> Result<(), AppError> {
        let rows = sqlx::query("DELETE FROM reviews WHERE id = $1 AND campground_id = $2")
            .bind(review_id)
            .bind(campground_id)
            .execute(self.pool())
            .await
            .map_err(|e| {
                log::error!("Failed to delete review {}: {}", review_id, e);
                AppError::UpstreamStoreFailure(format!("Delete review failed: {}", e))
            })?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::ResourceNotFound("Cannot find that review!".to_string()));
        }

        log::info!("Deleted review {} from campground {}", review_id, campground_id);
        Ok(())
    }
}
