// src/db/repository.rs
// DOCUMENTATION: Repository contracts and the PostgreSQL store
// PURPOSE: Abstract storage from guards, services and handlers

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::*;

/// User accounts
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user; a taken username or email is a ValidationFailed
    async fn create_user(&self, user: &NewUser) -> Result<User, AppError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;
}

/// Campground listings
#[async_trait]
pub trait CampgroundRepository: Send + Sync {
    /// All campgrounds, newest first
    async fn list(&self) -> Result<Vec<Campground>, AppError>;
    async fn get(&self, id: Uuid) -> Result<Option<Campground>, AppError>;
    /// Author reference only, for ownership checks
    async fn author_of(&self, id: Uuid) -> Result<Option<Uuid>, AppError>;
    async fn create(&self, campground: &NewCampground) -> Result<Campground, AppError>;
    /// Apply changes; ResourceNotFound when the id does not exist
    async fn update(&self, id: Uuid, changes: &CampgroundChanges) -> Result<Campground, AppError>;
    /// Delete the campground and its reviews; returns the number of reviews removed
    async fn delete(&self, id: Uuid) -> Result<u64, AppError>;
}

/// Reviews, always scoped to their campground
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Oldest first
    async fn list_for_campground(&self, campground_id: Uuid) -> Result<Vec<Review>, AppError>;
    async fn author_of(&self, campground_id: Uuid, review_id: Uuid) -> Result<Option<Uuid>, AppError>;
    /// ResourceNotFound when the campground does not exist
    async fn create(&self, review: &NewReview) -> Result<Review, AppError>;
    async fn delete(&self, campground_id: Uuid, review_id: Uuid) -> Result<(), AppError>;
}

/// Server-side sessions
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Unexpired session by id
    async fn load(&self, id: &str) -> Result<Option<SessionRecord>, AppError>;
    /// Insert or replace
    async fn save(&self, record: &SessionRecord) -> Result<(), AppError>;
    async fn destroy(&self, id: &str) -> Result<(), AppError>;
    /// Remove expired sessions; returns how many were removed
    async fn purge_expired(&self) -> Result<u64, AppError>;
}

/// PostgreSQL-backed implementation of every repository
/// DOCUMENTATION: Wraps the shared pool; cheap to clone
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Log and wrap a sqlx failure
pub(crate) fn store_error(action: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        log::error!("{} failed: {}", action, e);
        AppError::UpstreamStoreFailure(format!("{}: {}", action, e))
    }
}
