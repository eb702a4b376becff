// src/db/campground_repository.rs
// DOCUMENTATION: Campground database operations
// PURPOSE: CRUD for campgrounds with PostGIS point storage

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use geo_types::Point;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use super::repository::{store_error, CampgroundRepository, PgStore};
use crate::errors::AppError;
use crate::models::{Campground, CampgroundChanges, Image, NewCampground};

/// Internal struct for mapping database rows to Campground struct
/// DOCUMENTATION: Handles PostGIS POINT extraction via ST_X() and ST_Y()
#[derive(Debug, FromRow)]
struct CampgroundRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub location: String,
    pub longitude: f64, // From ST_X(geometry)
    pub latitude: f64,  // From ST_Y(geometry)
    pub images: Json<Vec<Image>>,
    pub author_id: Uuid,
    pub author_username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CampgroundRow {
    fn into_campground(self) -> Campground {
        Campground {
            id: self.id,
            title: self.title,
            description: self.description,
            price: self.price,
            location: self.location,
            geometry: Point::new(self.longitude, self.latitude),
            images: self.images.0,
            author_id: self.author_id,
            author_username: self.author_username,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

const SELECT_CAMPGROUND: &str = r#"
    SELECT
        c.id, c.title, c.description, c.price, c.location,
        ST_X(c.geometry) AS longitude, ST_Y(c.geometry) AS latitude,
        c.images, c.author_id, u.username AS author_username,
        c.created_at, c.updated_at
    FROM campgrounds c
    JOIN users u ON u.id = c.author_id
"#;

#[async_trait]
impl CampgroundRepository for PgStore {
    async fn list(&self) -> Result<Vec<Campground>, AppError> {
        let sql = format!("{} ORDER BY c.created_at DESC", SELECT_CAMPGROUND);
        let rows = sqlx::query_as::<_, CampgroundRow>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(store_error("List campgrounds"))?;

        Ok(rows.into_iter().map(CampgroundRow::into_campground).collect())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Campground>, AppError> {
        let sql = format!("{} WHERE c.id = $1", SELECT_CAMPGROUND);
        let row = sqlx::query_as::<_, CampgroundRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(store_error("Fetch campground"))?;

        Ok(row.map(CampgroundRow::into_campground))
    }

    async fn author_of(&self, id: Uuid) -> Result<Option<Uuid>, AppError> {
        let author = sqlx::query_as::<_, (Uuid,)>("SELECT author_id FROM campgrounds WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(store_error("Fetch campground author"))?;

        Ok(author.map(|(author_id,)| author_id))
    }

    async fn create(&self, campground: &NewCampground) -> Result<Campground, AppError> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO campgrounds (
                id, title, description, price, location,
                geometry, images, author_id, created_at, updated_at
            )
            VALUES (
                $1, $2, $3, $4, $5,
                ST_SetSRID(ST_MakePoint($6, $7), 4326),
                $8, $9, NOW(), NOW()
            )
            "#,
        )
        .bind(id) // $1
        .bind(&campground.title) // $2
        .bind(&campground.description) // $3
        .bind(campground.price) // $4
        .bind(&campground.location) // $5
        .bind(campground.geometry.x()) // $6 - longitude
        .bind(campground.geometry.y()) // $7 - latitude
        .bind(Json(&campground.images)) // $8
        .bind(campground.author_id) // $9
        .execute(self.pool())
        .await
        .map_err(store_error("Create campground"))?;

        let created = self
            .get(id)
            .await?
            .ok_or_else(|| AppError::Unhandled(format!("Campground {} vanished after insert", id)))?;

        log::info!("Created campground {} for author {}", id, campground.author_id);
        Ok(created)
    }

    async fn update(&self, id: Uuid, changes: &CampgroundChanges) -> Result<Campground, AppError> {
        let (longitude, latitude) = match changes.geometry {
            Some(point) => (Some(point.x()), Some(point.y())),
            None => (None, None),
        };

        // images: append new ones, then drop every entry whose filename is listed
        let updated = sqlx::query_as::<_, (Uuid,)>(
            r#"
            UPDATE campgrounds
            SET title = $1,
                description = $2,
                price = $3,
                location = $4,
                geometry = COALESCE(ST_SetSRID(ST_MakePoint($5, $6), 4326), geometry),
                images = (
                    SELECT COALESCE(jsonb_agg(img), '[]'::jsonb)
                    FROM jsonb_array_elements(images || $7) AS img
                    WHERE NOT (img->>'filename' = ANY($8))
                ),
                updated_at = NOW()
            WHERE id = $9
            RETURNING id
            "#,
        )
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(changes.price)
        .bind(&changes.location)
        .bind(longitude)
        .bind(latitude)
        .bind(Json(&changes.add_images))
        .bind(&changes.delete_images)
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(store_error("Update campground"))?;

        if updated.is_none() {
            return Err(AppError::ResourceNotFound("Cannot find that campground!".to_string()));
        }

        log::info!("Updated campground {}", id);
        self.get(id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Cannot find that campground!".to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<u64, AppError> {
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(store_error("Begin campground delete"))?;

        let reviews = sqlx::query("DELETE FROM reviews WHERE campground_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(store_error("Delete campground reviews"))?
            .rows_affected();

        let rows = sqlx::query("DELETE FROM campgrounds WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(store_error("Delete campground"))?
            .rows_affected();

        if rows == 0 {
            // dropping the transaction rolls it back
            return Err(AppError::ResourceNotFound("Cannot find that campground!".to_string()));
        }

        tx.commit()
            .await
            .map_err(store_error("Commit campground delete"))?;

        log::info!("Deleted campground {} and {} reviews", id, reviews);
        Ok(reviews)
    }
}
