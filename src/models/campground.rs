// src/models/campground.rs
// DOCUMENTATION: Core data structures for campgrounds
// PURPOSE: Domain record, request DTO and API response models

use chrono::{DateTime, Utc};
use geo_types::Point;
use geojson::{feature::Id, Feature, Geometry, JsonObject};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use super::fields::{one_or_many, trimmed_opt};
use super::validators::{finite, no_html, valid_coordinates};
use super::{Image, ImageResponse, ReviewResponse, UserSummary};
use crate::errors::AppError;

/// Represents a complete campground record
/// DOCUMENTATION: Mirrors the campgrounds table; geometry comes from ST_X/ST_Y
#[derive(Debug, Clone)]
pub struct Campground {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Nightly price, never negative
    pub price: f64,
    /// Free-form location as entered by the author
    pub location: String,
    /// x = longitude, y = latitude
    pub geometry: Point<f64>,
    pub images: Vec<Image>,
    /// Set at creation, never updated
    pub author_id: Uuid,
    pub author_username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload assembled by the service after geocoding
#[derive(Debug, Clone)]
pub struct NewCampground {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub location: String,
    pub geometry: Point<f64>,
    pub images: Vec<Image>,
    pub author_id: Uuid,
}

/// Update payload; the author is intentionally absent
#[derive(Debug, Clone)]
pub struct CampgroundChanges {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub location: String,
    /// Keep the stored point when None
    pub geometry: Option<Point<f64>>,
    pub add_images: Vec<Image>,
    /// Filenames to drop from the image list
    pub delete_images: Vec<String>,
}

/// Request DTO for creating or editing a campground
/// DOCUMENTATION: Body of POST /campgrounds and PUT /campgrounds/{id}
/// Required fields are Options so that every missing field is reported at once
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CampgroundForm {
    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(required, length(min = 1, max = 200), custom = "no_html")]
    pub title: Option<String>,

    #[serde(default)]
    #[validate(required, range(min = 0.0), custom = "finite")]
    pub price: Option<f64>,

    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(required, length(min = 1, max = 200), custom = "no_html")]
    pub location: Option<String>,

    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(required, length(min = 1), custom = "no_html")]
    pub description: Option<String>,

    /// Already-uploaded images to attach
    #[serde(default)]
    #[validate]
    pub images: Vec<Image>,

    /// Explicit [longitude, latitude], used when geocoding is unavailable
    #[validate(custom = "valid_coordinates")]
    pub geometry: Option<[f64; 2]>,

    /// Filenames to remove (edit only)
    #[serde(default, deserialize_with = "one_or_many")]
    pub delete_images: Vec<String>,
}

/// Required scalar fields of a validated form
#[derive(Debug, Clone, PartialEq)]
pub struct CampgroundFields {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub location: String,
}

impl CampgroundForm {
    /// Unpack required fields; call after validation
    pub fn fields(&self) -> Result<CampgroundFields, AppError> {
        match (&self.title, self.price, &self.location, &self.description) {
            (Some(title), Some(price), Some(location), Some(description)) => Ok(CampgroundFields {
                title: title.clone(),
                description: description.clone(),
                price,
                location: location.clone(),
            }),
            _ => Err(AppError::ValidationFailed(
                "campground is missing required fields".to_string(),
            )),
        }
    }

    pub fn point(&self) -> Option<Point<f64>> {
        self.geometry.map(|[lng, lat]| Point::new(lng, lat))
    }
}

/// Response DTO for API responses
#[derive(Debug, Clone, Serialize)]
pub struct CampgroundResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub location: String,
    /// GeoJSON Point
    pub geometry: Geometry,
    pub images: Vec<ImageResponse>,
    pub author: UserSummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Detailed response DTO
/// DOCUMENTATION: Used for GET /campgrounds/{id}
#[derive(Debug, Serialize)]
pub struct CampgroundDetailResponse {
    #[serde(flatten)]
    pub campground: CampgroundResponse,
    pub reviews: Vec<ReviewResponse>,
}

impl Campground {
    pub fn geojson_geometry(&self) -> Geometry {
        Geometry::new(geojson::Value::Point(vec![
            self.geometry.x(),
            self.geometry.y(),
        ]))
    }

    /// Short HTML snippet shown in the cluster map popup
    pub fn pop_up_markup(&self) -> String {
        let excerpt: String = self.description.chars().take(20).collect();
        format!(
            "<strong><a href=\"/campgrounds/{}\">{}</a></strong><p>{}...</p>",
            self.id, self.title, excerpt
        )
    }

    /// GeoJSON feature for the campgrounds map
    pub fn to_feature(&self) -> Feature {
        let mut properties = JsonObject::new();
        properties.insert("popUpMarkup".to_string(), json!(self.pop_up_markup()));
        properties.insert("title".to_string(), json!(self.title));
        properties.insert("price".to_string(), json!(self.price));

        Feature {
            bbox: None,
            geometry: Some(self.geojson_geometry()),
            id: Some(Id::String(self.id.to_string())),
            properties: Some(properties),
            foreign_members: None,
        }
    }

    /// Convert domain record to API response DTO
    pub fn to_response(&self) -> CampgroundResponse {
        CampgroundResponse {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            price: self.price,
            location: self.location.clone(),
            geometry: self.geojson_geometry(),
            images: self.images.iter().map(Image::to_response).collect(),
            author: UserSummary {
                id: self.author_id,
                username: self.author_username.clone(),
            },
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_form;

    fn campground() -> Campground {
        Campground {
            id: Uuid::nil(),
            title: "Misty Bay".into(),
            description: "A quiet spot next to the water with a view".into(),
            price: 12.5,
            location: "Moab, Utah".into(),
            geometry: Point::new(-109.55, 38.57),
            images: vec![],
            author_id: Uuid::nil(),
            author_username: "falcon".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn missing_fields_are_all_reported() {
        let form = CampgroundForm {
            title: Some("Ridge".into()),
            ..Default::default()
        };
        let errors = form.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("price"));
        assert!(fields.contains_key("location"));
        assert!(fields.contains_key("description"));
        assert!(!fields.contains_key("title"));
    }

    #[test]
    fn negative_price_fails_validation() {
        let form = CampgroundForm {
            price: Some(-5.0),
            ..sample_form("Ridge")
        };
        assert!(form.validate().unwrap_err().field_errors().contains_key("price"));
    }

    #[test]
    fn fields_are_trimmed_on_decode() {
        let form: CampgroundForm = serde_json::from_value(json!({
            "title": "  Ridge ",
            "price": 10,
            "location": " Moab ",
            "description": "Quiet\n",
        }))
        .unwrap();
        assert!(form.validate().is_ok());
        let fields = form.fields().unwrap();
        assert_eq!(fields.title, "Ridge");
        assert_eq!(fields.location, "Moab");
        assert_eq!(fields.description, "Quiet");
    }

    #[test]
    fn whitespace_only_text_fails_validation() {
        let form: CampgroundForm = serde_json::from_value(json!({
            "title": "   ",
            "price": 10,
            "location": "\t",
            "description": " ",
        }))
        .unwrap();
        let errors = form.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("location"));
        assert!(fields.contains_key("description"));
    }

    #[test]
    fn non_finite_price_fails_validation() {
        for price in [f64::NAN, f64::INFINITY] {
            let form = CampgroundForm {
                price: Some(price),
                ..sample_form("Ridge")
            };
            assert!(form.validate().unwrap_err().field_errors().contains_key("price"));
        }
    }

    #[test]
    fn pop_up_markup_links_and_truncates() {
        let markup = campground().pop_up_markup();
        assert!(markup.contains("href=\"/campgrounds/00000000-0000-0000-0000-000000000000\""));
        assert!(markup.contains("<p>A quiet spot next to...</p>"));
    }

    #[test]
    fn feature_carries_point_geometry() {
        let feature = campground().to_feature();
        let geometry = feature.geometry.unwrap();
        assert_eq!(geometry.value, geojson::Value::Point(vec![-109.55, 38.57]));
        assert!(feature.properties.unwrap().contains_key("popUpMarkup"));
    }
}
