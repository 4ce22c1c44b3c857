//! Product CRUD endpoints
//!
//! Every handler runs behind the auth middleware and scopes its queries
//! to the current user. Cross-user access reads as 404, never 403.

use axum::{
    Extension, Json,
    extract::{Multipart, Path, Query, State, multipart::Field},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use tracing::error;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    middleware::CurrentUser,
    models::{Image, NewProduct, ProductChanges, ProductListResponse, ProductResponse},
    state::AppState,
    storage::{ImageStore, UploadedFile},
    validation::{self, ProductForm},
};

/// Fixed page size for product listings
const PAGE_SIZE: u32 = 10;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
}

/// List the caller's products, newest first, with their images
pub async fn list(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = query.page.unwrap_or(1).max(1);

    let (products, total) = state
        .product_repository
        .list_for_user(current.user.id, page, PAGE_SIZE)
        .await
        .map_err(|e| {
            error!("Failed to list products: {}", e);
            ApiError::InternalServerError
        })?;

    let product_ids: Vec<Uuid> = products.iter().map(|product| product.id).collect();
    let images = state
        .product_repository
        .images_for_products(&product_ids)
        .await
        .map_err(|e| {
            error!("Failed to load product images: {}", e);
            ApiError::InternalServerError
        })?;

    let mut images_by_product: HashMap<Uuid, Vec<Image>> = HashMap::new();
    for image in images {
        images_by_product
            .entry(image.product_id)
            .or_default()
            .push(image);
    }

    let public_url = state.config.public_url.as_deref();
    let items = products
        .iter()
        .map(|product| {
            let images = images_by_product
                .get(&product.id)
                .map_or(&[][..], Vec::as_slice);
            ProductResponse::new(product, images, public_url)
        })
        .collect();

    Ok(Json(ProductListResponse {
        items,
        page,
        limit: PAGE_SIZE,
        total,
    }))
}

/// Create a product with at least one uploaded image
pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = read_product_form(&mut multipart).await?;
    let fields = validation::validate_product_form(&form, true).map_err(ApiError::Validation)?;

    let product = state
        .product_repository
        .create(&NewProduct {
            user_id: current.user.id,
            title: fields.title,
            description: fields.description,
            cost: fields.cost,
        })
        .await
        .map_err(|e| {
            error!("Failed to create product: {}", e);
            ApiError::InternalServerError
        })?;

    let images = store_images(&state, product.id, &form.images).await?;

    let response = ProductResponse::new(&product, &images, state.config.public_url.as_deref());
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "product": response,
            "message": "Product created successfully"
        })),
    ))
}

/// Show a single product with its images, scoped to the caller
pub async fn show(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let product = state
        .product_repository
        .find_for_user(id, current.user.id)
        .await
        .map_err(|e| {
            error!("Failed to load product: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound)?;

    let images = state
        .product_repository
        .images_for_product(product.id)
        .await
        .map_err(|e| {
            error!("Failed to load product images: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(ProductResponse::new(
        &product,
        &images,
        state.config.public_url.as_deref(),
    )))
}

/// Update a product's scalar fields; new images, if supplied, are
/// appended to the existing set
pub async fn update(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    // Ownership first: a product someone else owns is a 404 before the
    // payload is even looked at
    state
        .product_repository
        .find_for_user(id, current.user.id)
        .await
        .map_err(|e| {
            error!("Failed to load product: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound)?;

    let form = read_product_form(&mut multipart).await?;
    let fields = validation::validate_product_form(&form, false).map_err(ApiError::Validation)?;

    let product = state
        .product_repository
        .update_for_user(
            id,
            current.user.id,
            &ProductChanges {
                title: fields.title,
                description: fields.description,
                cost: fields.cost,
            },
        )
        .await
        .map_err(|e| {
            error!("Failed to update product: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound)?;

    store_images(&state, product.id, &form.images).await?;

    let images = state
        .product_repository
        .images_for_product(product.id)
        .await
        .map_err(|e| {
            error!("Failed to load product images: {}", e);
            ApiError::InternalServerError
        })?;

    let response = ProductResponse::new(&product, &images, state.config.public_url.as_deref());
    Ok(Json(json!({
        "product": response,
        "message": "Product updated successfully"
    })))
}

/// Delete a product and its image records. Stored files stay on disk.
pub async fn destroy(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state
        .product_repository
        .delete_for_user(id, current.user.id)
        .await
        .map_err(|e| {
            error!("Failed to delete product: {}", e);
            ApiError::InternalServerError
        })?;

    if !deleted {
        return Err(ApiError::NotFound);
    }

    Ok(Json(json!({
        "message": "Product and its images deleted successfully"
    })))
}

/// Store uploaded files and record one image row per file
async fn store_images(
    state: &AppState,
    product_id: Uuid,
    files: &[UploadedFile],
) -> ApiResult<Vec<Image>> {
    let mut images = Vec::with_capacity(files.len());

    for file in files {
        let path = state
            .image_store
            .store(product_id, &file.original_name, &file.bytes)
            .await
            .map_err(|e| {
                error!("Failed to store uploaded image: {}", e);
                ApiError::InternalServerError
            })?;

        let image = state
            .product_repository
            .add_image(product_id, &path)
            .await
            .map_err(|e| {
                error!("Failed to record image: {}", e);
                ApiError::InternalServerError
            })?;

        images.push(image);
    }

    Ok(images)
}

/// Assemble a [`ProductForm`] from a multipart request. Unknown fields
/// are ignored; image files may arrive as `images` or `images[]`.
async fn read_product_form(multipart: &mut Multipart) -> Result<ProductForm, ApiError> {
    let mut form = ProductForm::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError::BadRequest(format!("Malformed multipart body: {e}"))
    })? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => form.title = Some(text_field(field).await?),
            "description" => form.description = Some(text_field(field).await?),
            "cost" => form.cost = Some(text_field(field).await?),
            "images" | "images[]" => {
                let original_name = field.file_name().unwrap_or("upload").to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    ApiError::BadRequest(format!("Failed to read uploaded file: {e}"))
                })?;
                form.images.push(UploadedFile {
                    original_name,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {}
        }
    }

    Ok(form)
}

async fn text_field(field: Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read form field: {e}")))
}
