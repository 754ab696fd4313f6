//! Repository for the `products` table.

use ecom_core::types::DbId;
use sqlx::PgPool;

use crate::models::product::{CreateProduct, Product, ProductExportRow, UpdateProduct};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, category_id, title, description, price, status, created_at, updated_at";

/// Provides CRUD operations for products.
pub struct ProductRepo;

impl ProductRepo {
    /// Insert a new product, returning the created row.
    ///
    /// If `status` is `None` in the input, defaults to `true`.
    pub async fn create(pool: &PgPool, input: &CreateProduct) -> Result<Product, sqlx::Error> {
        let query = format!(
            "INSERT INTO products (category_id, title, description, price, status)
             VALUES ($1, $2, $3, $4, COALESCE($5, TRUE))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(input.category_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.price)
            .bind(input.status)
            .fetch_one(pool)
            .await
    }

    /// Find a product by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = $1");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all products in insertion order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products ORDER BY id");
        sqlx::query_as::<_, Product>(&query).fetch_all(pool).await
    }

    /// Update a product. Only non-`None` fields in `input` are applied and
    /// `updated_at` is always refreshed.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProduct,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!(
            "UPDATE products SET
                category_id = COALESCE($2, category_id),
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                price = COALESCE($5, price),
                status = COALESCE($6, status),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .bind(input.category_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.price)
            .bind(input.status)
            .fetch_optional(pool)
            .await
    }

    /// Delete a product by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count all products.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Every product joined with its category name, for the CSV export.
    ///
    /// Reads the whole table in one query; there is no pagination.
    pub async fn list_for_export(pool: &PgPool) -> Result<Vec<ProductExportRow>, sqlx::Error> {
        sqlx::query_as::<_, ProductExportRow>(
            "SELECT p.id, c.name AS category_name, p.title, p.description, p.price,
                    p.status, p.created_at, p.updated_at
             FROM products p
             JOIN categories c ON c.id = p.category_id
             ORDER BY p.id",
        )
        .fetch_all(pool)
        .await
    }
}
