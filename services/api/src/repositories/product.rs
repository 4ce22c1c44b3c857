//! Product repository for database operations
//!
//! Every query here is scoped to the owning user's id. A product that
//! belongs to someone else behaves exactly like one that does not exist.

use anyhow::Result;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use crate::models::{Image, NewProduct, Product, ProductChanges};

/// Product repository
#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    /// Create a new product repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new product
    pub async fn create(&self, new_product: &NewProduct) -> Result<Product> {
        info!(
            "Creating product '{}' for user: {}",
            new_product.title, new_product.user_id
        );

        let row = sqlx::query(
            r#"
            INSERT INTO products (user_id, title, description, cost)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, title, description, cost, created_at, updated_at
            "#,
        )
        .bind(new_product.user_id)
        .bind(&new_product.title)
        .bind(&new_product.description)
        .bind(new_product.cost)
        .fetch_one(&self.pool)
        .await?;

        Ok(row_to_product(&row))
    }

    /// List a user's products, newest first, with the total count
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        page: u32,
        limit: u32,
    ) -> Result<(Vec<Product>, i64)> {
        let offset = (page.saturating_sub(1)) as i64 * limit as i64;

        let rows = sqlx::query(
            r#"
            SELECT id, user_id, title, description, cost, created_at, updated_at
            FROM products
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok((rows.iter().map(row_to_product).collect(), total))
    }

    /// Find a product by ID, scoped to its owner
    pub async fn find_for_user(&self, id: Uuid, user_id: Uuid) -> Result<Option<Product>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, title, description, cost, created_at, updated_at
            FROM products
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| row_to_product(&row)))
    }

    /// Update a product's scalar fields, scoped to its owner
    pub async fn update_for_user(
        &self,
        id: Uuid,
        user_id: Uuid,
        changes: &ProductChanges,
    ) -> Result<Option<Product>> {
        info!("Updating product {} for user: {}", id, user_id);

        let row = sqlx::query(
            r#"
            UPDATE products
            SET title = $3, description = $4, cost = $5, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, description, cost, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(changes.cost)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| row_to_product(&row)))
    }

    /// Delete a product and its image records in one transaction, scoped
    /// to its owner. Image rows go first so the invariant holds even
    /// without the schema-level cascade. Stored files are not removed.
    pub async fn delete_for_user(&self, id: Uuid, user_id: Uuid) -> Result<bool> {
        info!("Deleting product {} for user: {}", id, user_id);

        let mut tx = self.pool.begin().await?;

        let owned = sqlx::query("SELECT id FROM products WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;

        if owned.is_none() {
            return Ok(false);
        }

        sqlx::query("DELETE FROM images WHERE product_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Attach an image record to a product
    pub async fn add_image(&self, product_id: Uuid, path: &str) -> Result<Image> {
        let row = sqlx::query(
            r#"
            INSERT INTO images (product_id, image)
            VALUES ($1, $2)
            RETURNING id, product_id, image, created_at
            "#,
        )
        .bind(product_id)
        .bind(path)
        .fetch_one(&self.pool)
        .await?;

        Ok(row_to_image(&row))
    }

    /// Images for a single product
    pub async fn images_for_product(&self, product_id: Uuid) -> Result<Vec<Image>> {
        let rows = sqlx::query(
            r#"
            SELECT id, product_id, image, created_at
            FROM images
            WHERE product_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_image).collect())
    }

    /// Images for a page of products, fetched in one round trip
    pub async fn images_for_products(&self, product_ids: &[Uuid]) -> Result<Vec<Image>> {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(
            r#"
            SELECT id, product_id, image, created_at
            FROM images
            WHERE product_id = ANY($1)
            ORDER BY created_at
            "#,
        )
        .bind(product_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_image).collect())
    }
}

fn row_to_product(row: &PgRow) -> Product {
    Product {
        id: row.get("id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        description: row.get("description"),
        cost: row.get("cost"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn row_to_image(row: &PgRow) -> Image {
    Image {
        id: row.get("id"),
        product_id: row.get("product_id"),
        image: row.get("image"),
        created_at: row.get("created_at"),
    }
}
