//! Product and image models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub cost: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Image entity. `image` is the path of the stored file relative to the
/// public upload root.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Image {
    pub id: Uuid,
    pub product_id: Uuid,
    pub image: String,
    pub created_at: DateTime<Utc>,
}

/// New product creation payload
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub cost: f64,
}

/// Scalar field changes for a product update
#[derive(Debug, Clone)]
pub struct ProductChanges {
    pub title: String,
    pub description: String,
    pub cost: f64,
}

/// Image representation returned to clients
#[derive(Debug, Clone, Serialize)]
pub struct ImageResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub image: String,
}

impl ImageResponse {
    /// Build a response for an image record. When a public base URL is
    /// configured the relative path is rewritten to an absolute URL;
    /// otherwise the relative path passes through unchanged.
    pub fn new(image: &Image, public_url: Option<&str>) -> Self {
        let path = match public_url {
            Some(base) => format!("{}/storage/{}", base.trim_end_matches('/'), image.image),
            None => image.image.clone(),
        };

        ImageResponse {
            id: image.id,
            product_id: image.product_id,
            image: path,
        }
    }
}

/// Product representation returned to clients, with its images
#[derive(Debug, Clone, Serialize)]
pub struct ProductResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub cost: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub images: Vec<ImageResponse>,
}

impl ProductResponse {
    pub fn new(product: &Product, images: &[Image], public_url: Option<&str>) -> Self {
        ProductResponse {
            id: product.id,
            user_id: product.user_id,
            title: product.title.clone(),
            description: product.description.clone(),
            cost: product.cost,
            created_at: product.created_at,
            updated_at: product.updated_at,
            images: images
                .iter()
                .map(|image| ImageResponse::new(image, public_url))
                .collect(),
        }
    }
}

/// Paginated product listing
#[derive(Debug, Clone, Serialize)]
pub struct ProductListResponse {
    pub items: Vec<ProductResponse>,
    pub page: u32,
    pub limit: u32,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_image() -> Image {
        Image {
            id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            image: "products/1700000000_abc_deadbeef.jpg".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn image_response_keeps_relative_path_without_base_url() {
        let image = sample_image();
        let response = ImageResponse::new(&image, None);
        assert_eq!(response.image, image.image);
    }

    #[test]
    fn image_response_rewrites_to_absolute_url() {
        let image = sample_image();
        let response = ImageResponse::new(&image, Some("https://shop.example.com"));
        assert_eq!(
            response.image,
            format!("https://shop.example.com/storage/{}", image.image)
        );
    }

    #[test]
    fn image_response_trims_trailing_slash_on_base_url() {
        let image = sample_image();
        let response = ImageResponse::new(&image, Some("https://shop.example.com/"));
        assert_eq!(
            response.image,
            format!("https://shop.example.com/storage/{}", image.image)
        );
    }
}
