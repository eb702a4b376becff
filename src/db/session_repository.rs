// src/db/session_repository.rs
// DOCUMENTATION: Session store backed by the sessions table

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use super::repository::{store_error, PgStore, SessionRepository};
use crate::errors::AppError;
use crate::models::{FlashMessage, SessionRecord};

#[derive(Debug, FromRow)]
struct SessionRow {
    id: String,
    user_id: Option<Uuid>,
    flash: Json<Vec<FlashMessage>>,
    return_to: Option<String>,
    expires_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[async_trait]
impl SessionRepository for PgStore {
    async fn load(&self, id: &str) -> Result<Option<SessionRecord>, AppError> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, user_id, flash, return_to, expires_at, updated_at
            FROM sessions
            WHERE id = $1 AND expires_at > NOW()
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(store_error("Load session"))?;

        Ok(row.map(|row| SessionRecord {
            id: row.id,
            user_id: row.user_id,
            flash: row.flash.0,
            return_to: row.return_to,
            expires_at: row.expires_at,
            updated_at: row.updated_at,
        }))
    }

    async fn save(&self, record: &SessionRecord) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO sessions (id, user_id, flash, return_to, expires_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE
            SET user_id = EXCLUDED.user_id,
                flash = EXCLUDED.flash,
                return_to = EXCLUDED.return_to,
                expires_at = EXCLUDED.expires_at,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(&record.id)
        .bind(record.user_id)
        .bind(Json(&record.flash))
        .bind(&record.return_to)
        .bind(record.expires_at)
        .bind(record.updated_at)
        .execute(self.pool())
        .await
        .map_err(store_error("Save session"))?;

        Ok(())
    }

    async fn destroy(&self, id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(store_error("Destroy session"))?;
        Ok(())
    }

    async fn purge_expired(&self) -> Result<u64, AppError> {
        let removed = sqlx::query("DELETE FROM sessions WHERE expires_at <= NOW()")
            .execute(self.pool())
            .await
            .map_err(store_error("Purge sessions"))?
            .rows_affected();
        Ok(removed)
    }
}
