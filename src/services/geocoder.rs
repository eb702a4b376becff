// src/services/geocoder.rs
// DOCUMENTATION: Mapbox forward geocoding client
// PURPOSE: Turn a free-form campground location into a point

use crate::errors::AppError;
use geo_types::Point;
use geojson::FeatureCollection;
use reqwest::{Client, Url};

/// Mapbox Geocoding API client
/// DOCUMENTATION: One request per lookup, first match wins
#[derive(Clone)]
pub struct MapboxGeocoder {
    /// HTTP client for making requests
    client: Client,
    /// Mapbox access token
    token: String,
    /// Base URL, overridable for tests and proxies
    base_url: String,
}

impl MapboxGeocoder {
    pub fn new(token: String) -> Self {
        Self::with_base_url(token, "https://api.mapbox.com".to_string())
    }

    pub fn with_base_url(token: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            token,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build the forward geocoding URL for `query`
    /// The query is a single, percent-encoded path segment.
    pub fn forward_url(&self, query: &str) -> Result<Url, AppError> {
        let mut url = Url::parse(&format!("{}/geocoding/v5/mapbox.places/", self.base_url))
            .map_err(|e| AppError::ExternalService(format!("Invalid geocoder URL: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| AppError::ExternalService("Geocoder URL cannot be a base".to_string()))?
            .pop_if_empty()
            .push(&format!("{}.json", query));

        url.query_pairs_mut()
            .append_pair("access_token", &self.token)
            .append_pair("limit", "1");

        Ok(url)
    }

    /// Geocode a location string
    /// DOCUMENTATION: Ok(None) when Mapbox has no match
    pub async fn forward(&self, query: &str) -> Result<Option<Point<f64>>, AppError> {
        let url = self.forward_url(query)?;

        log::debug!("Mapbox forward geocode: {}", query);

        let response = self.client.get(url).send().await.map_err(|e| {
            log::error!("Mapbox request failed: {}", e);
            AppError::ExternalService(format!("Request failed: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            log::error!("Mapbox API error {}: {}", status, body);
            return Err(AppError::ExternalService(format!("API error {}: {}", status, body)));
        }

        let collection: FeatureCollection = response.json().await.map_err(|e| {
            log::error!("Failed to parse Mapbox response: {}", e);
            AppError::ExternalService(format!("Parse error: {}", e))
        })?;

        let point = first_point(&collection);
        if point.is_none() {
            log::info!("Mapbox found no match for '{}'", query);
        }
        Ok(point)
    }
}

/// Point geometry of the first feature, if any
pub fn first_point(collection: &FeatureCollection) -> Option<Point<f64>> {
    collection
        .features
        .first()
        .and_then(|feature| feature.geometry.as_ref())
        .and_then(|geometry| match &geometry.value {
            geojson::Value::Point(coords) if coords.len() >= 2 => {
                Some(Point::new(coords[0], coords[1]))
            }
            _ => None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAPBOX_RESPONSE: &str = r#"{
        "type": "FeatureCollection",
        "query": ["moab"],
        "features": [
            {
                "id": "place.123",
                "type": "Feature",
                "place_name": "Moab, Utah, United States",
                "properties": {},
                "geometry": { "type": "Point", "coordinates": [-109.5498, 38.5733] }
            }
        ],
        "attribution": "NOTICE: Mapbox"
    }"#;

    #[test]
    fn first_point_reads_longitude_then_latitude() {
        let collection: FeatureCollection = serde_json::from_str(MAPBOX_RESPONSE).unwrap();
        let point = first_point(&collection).unwrap();
        assert_eq!(point.x(), -109.5498);
        assert_eq!(point.y(), 38.5733);
    }

    #[test]
    fn empty_collection_has_no_point() {
        let collection: FeatureCollection =
            serde_json::from_str(r#"{"type": "FeatureCollection", "features": []}"#).unwrap();
        assert!(first_point(&collection).is_none());
    }

    #[test]
    fn forward_url_encodes_query_as_one_segment() {
        let geocoder = MapboxGeocoder::with_base_url("tok".into(), "https://geo.test/".into());
        let url = geocoder.forward_url("Moab, Utah/USA").unwrap();
        assert_eq!(
            url.as_str(),
            "https://geo.test/geocoding/v5/mapbox.places/Moab,%20Utah%2FUSA.json?access_token=tok&limit=1"
        );
    }
}
