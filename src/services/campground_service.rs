// src/services/campground_service.rs
// DOCUMENTATION: Business logic for campground listings
// PURPOSE: Orchestrate geocoding, persistence and response shaping

use geo_types::Point;
use geojson::FeatureCollection;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{
    Campground, CampgroundChanges, CampgroundDetailResponse, CampgroundForm, CampgroundResponse,
    NewCampground,
};
use crate::state::AppState;

pub const CAMPGROUND_NOT_FOUND: &str = "Cannot find that campground!";

/// Campground service
/// DOCUMENTATION: Handlers call this after the guards have run
pub struct CampgroundService;

impl CampgroundService {
    /// Every campground, newest first
    pub async fn list(state: &AppState) -> Result<Vec<CampgroundResponse>, AppError> {
        let campgrounds = state.campgrounds.list().await?;
        Ok(campgrounds.iter().map(Campground::to_response).collect())
    }

    /// Feature collection for the cluster map
    pub async fn map(state: &AppState) -> Result<FeatureCollection, AppError> {
        let campgrounds = state.campgrounds.list().await?;
        Ok(FeatureCollection {
            bbox: None,
            features: campgrounds.iter().map(Campground::to_feature).collect(),
            foreign_members: None,
        })
    }

    pub async fn find(state: &AppState, id: Uuid) -> Result<Campground, AppError> {
        state
            .campgrounds
            .get(id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(CAMPGROUND_NOT_FOUND.to_string()))
    }

    /// Campground with its reviews, oldest review first
    pub async fn show(state: &AppState, id: Uuid) -> Result<CampgroundDetailResponse, AppError> {
        let campground = Self::find(state, id).await?;
        let reviews = state.reviews.list_for_campground(id).await?;

        Ok(CampgroundDetailResponse {
            campground: campground.to_response(),
            reviews: reviews.iter().map(|r| r.to_response()).collect(),
        })
    }

    /// Create a campground authored by `author_id`
    /// DOCUMENTATION: The form has already passed validation
    pub async fn create(
        state: &AppState,
        author_id: Uuid,
        form: &CampgroundForm,
    ) -> Result<Campground, AppError> {
        let fields = form.fields()?;
        let geometry = Self::resolve_geometry(state, form, &fields.location).await?;

        let campground = state
            .campgrounds
            .create(&NewCampground {
                title: fields.title,
                description: fields.description,
                price: fields.price,
                location: fields.location,
                geometry,
                images: form.images.clone(),
                author_id,
            })
            .await?;

        log::info!("Campground {} created by {}", campground.id, author_id);
        Ok(campground)
    }

    /// Apply an edit; the stored point is only replaced by explicit coordinates
    pub async fn update(
        state: &AppState,
        id: Uuid,
        form: &CampgroundForm,
    ) -> Result<Campground, AppError> {
        let fields = form.fields()?;

        let campground = state
            .campgrounds
            .update(
                id,
                &CampgroundChanges {
                    title: fields.title,
                    description: fields.description,
                    price: fields.price,
                    location: fields.location,
                    geometry: form.point(),
                    add_images: form.images.clone(),
                    delete_images: form.delete_images.clone(),
                },
            )
            .await?;

        log::info!("Campground {} updated", id);
        Ok(campground)
    }

    /// Delete a campground together with its reviews
    pub async fn delete(state: &AppState, id: Uuid) -> Result<(), AppError> {
        let removed = state.campgrounds.delete(id).await?;
        log::info!("Campground {} deleted with {} reviews", id, removed);
        Ok(())
    }

    /// Explicit coordinates win, then the geocoder
    async fn resolve_geometry(
        state: &AppState,
        form: &CampgroundForm,
        location: &str,
    ) -> Result<Point<f64>, AppError> {
        if let Some(point) = form.point() {
            return Ok(point);
        }

        if let Some(geocoder) = &state.geocoder {
            if let Some(point) = geocoder.forward(location).await? {
                return Ok(point);
            }
        } else {
            log::warn!("No geocoder configured and no coordinates supplied for '{}'", location);
        }

        Err(AppError::ValidationFailed("Unable to geocode location".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Image, ReviewForm};
    use crate::services::ReviewService;
    use crate::testing::{memory_state, sample_form, seed_user};

    #[tokio::test]
    async fn create_uses_explicit_coordinates() {
        let state = memory_state();
        let author = seed_user(&state, "falcon").await;

        let campground = CampgroundService::create(&state, author.id, &sample_form("Ridge"))
            .await
            .unwrap();
        assert_eq!(campground.author_id, author.id);
        assert_eq!(campground.geometry, Point::new(-109.55, 38.57));
    }

    #[tokio::test]
    async fn create_without_coordinates_or_geocoder_fails() {
        let state = memory_state();
        let author = seed_user(&state, "falcon").await;
        let form = CampgroundForm {
            geometry: None,
            ..sample_form("Ridge")
        };

        let err = CampgroundService::create(&state, author.id, &form).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationFailed(m) if m == "Unable to geocode location"));
        assert!(CampgroundService::list(&state).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_keeps_point_when_no_coordinates_given() {
        let state = memory_state();
        let author = seed_user(&state, "falcon").await;
        let created = CampgroundService::create(&state, author.id, &sample_form("Ridge"))
            .await
            .unwrap();

        let form = CampgroundForm {
            geometry: None,
            images: vec![Image {
                url: "https://res.cloudinary.com/demo/image/upload/pine.jpg".into(),
                filename: "YelpCamp/pine".into(),
            }],
            ..sample_form("Ridge Top")
        };
        let updated = CampgroundService::update(&state, created.id, &form).await.unwrap();
        assert_eq!(updated.title, "Ridge Top");
        assert_eq!(updated.geometry, created.geometry);
        assert_eq!(updated.images.len(), 1);
        assert_eq!(updated.author_id, author.id);
    }

    #[tokio::test]
    async fn show_includes_reviews_and_missing_is_not_found() {
        let state = memory_state();
        let author = seed_user(&state, "falcon").await;
        let created = CampgroundService::create(&state, author.id, &sample_form("Ridge"))
            .await
            .unwrap();
        ReviewService::create(
            &state,
            created.id,
            author.id,
            ReviewForm {
                body: Some("Lovely".into()),
                rating: Some(4),
            },
        )
        .await
        .unwrap();

        let detail = CampgroundService::show(&state, created.id).await.unwrap();
        assert_eq!(detail.reviews.len(), 1);
        assert_eq!(detail.reviews[0].author.username, "falcon");

        let err = CampgroundService::show(&state, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::ResourceNotFound(m) if m == CAMPGROUND_NOT_FOUND));
    }

    #[tokio::test]
    async fn map_has_one_feature_per_campground() {
        let state = memory_state();
        let author = seed_user(&state, "falcon").await;
        for title in ["One", "Two"] {
            CampgroundService::create(&state, author.id, &sample_form(title))
                .await
                .unwrap();
        }
        let map = CampgroundService::map(&state).await.unwrap();
        assert_eq!(map.features.len(), 2);
    }
}
