// src/db/user_repository.rs
// DOCUMENTATION: User account database operations

use async_trait::async_trait;
use uuid::Uuid;

use super::repository::{store_error, PgStore, UserRepository};
use crate::errors::AppError;
use crate::models::{NewUser, User};

#[async_trait]
impl UserRepository for PgStore {
    async fn create_user(&self, user: &NewUser) -> Result<User, AppError> {
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING id, username, email, password_hash, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(self.pool())
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    let field = match db.constraint() {
                        Some("users_email_key") => "email",
                        _ => "username",
                    };
                    return AppError::ValidationFailed(format!(
                        "A user with the given {} is already registered",
                        field
                    ));
                }
            }
            store_error("Create user")(e)
        })?;

        log::info!("Registered user {} ({})", created.username, created.id);
        Ok(created)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(self.pool())
        .await
        .map_err(store_error("Fetch user by username"))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(store_error("Fetch user by id"))
    }
}
