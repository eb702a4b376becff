// src/models/image.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Image already hosted by the media CDN
/// `filename` is the storage key the CDN knows the asset by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Image {
    #[validate(url)]
    pub url: String,
    #[validate(length(min = 1, max = 255))]
    pub filename: String,
}

/// Image DTO for API responses
#[derive(Debug, Clone, Serialize)]
pub struct ImageResponse {
    pub url: String,
    pub filename: String,
    pub thumbnail_url: String,
}

impl Image {
    /// Width-limited rendition served by the CDN transformation path
    pub fn thumbnail_url(&self) -> String {
        self.url.replacen("/upload", "/upload/w_200", 1)
    }

    /// Convert stored image into API response DTO
    pub fn to_response(&self) -> ImageResponse {
        ImageResponse {
            url: self.url.clone(),
            filename: self.filename.clone(),
            thumbnail_url: self.thumbnail_url(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thumbnail_inserts_width_transform() {
        let image = Image {
            url: "https://res.cloudinary.com/demo/image/upload/v1651686945/YelpCamp/a.jpg".into(),
            filename: "YelpCamp/a".into(),
        };
        assert_eq!(
            image.thumbnail_url(),
            "https://res.cloudinary.com/demo/image/upload/w_200/v1651686945/YelpCamp/a.jpg"
        );
    }

    #[test]
    fn thumbnail_leaves_foreign_urls_alone() {
        let image = Image {
            url: "https://example.com/a.jpg".into(),
            filename: "a".into(),
        };
        assert_eq!(image.thumbnail_url(), image.url);
    }
}
