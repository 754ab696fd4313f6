//! The catalog store seam.
//!
//! Handlers and the generation runner talk to a [`CatalogStore`] trait object
//! held in shared state instead of reaching for a global pool. The production
//! implementation is [`PgCatalogStore`]; the `memory` feature adds an
//! in-process implementation for tests.

use async_trait::async_trait;
use ecom_core::types::DbId;

use crate::models::category::{Category, CreateCategory, UpdateCategory};
use crate::models::product::{CreateProduct, Product, ProductExportRow, UpdateProduct};
use crate::models::user::{CreateUser, User};
use crate::repositories::{CategoryRepo, ProductRepo, UserRepo};
use crate::DbPool;

#[cfg(feature = "memory")]
pub mod memory;

#[cfg(feature = "memory")]
pub use memory::MemoryCatalogStore;

/// PostgreSQL error code for a foreign key violation.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// PostgreSQL error code for a unique constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

/// Failures surfaced by a [`CatalogStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A product referenced a category that does not exist.
    #[error("Category {0} does not exist")]
    UnknownCategory(DbId),

    #[error("Username '{0}' is already taken")]
    DuplicateUsername(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistent storage for categories, products, and users.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Verify the backing storage is reachable.
    async fn health_check(&self) -> StoreResult<()>;

    async fn list_categories(&self) -> StoreResult<Vec<Category>>;
    async fn find_category(&self, id: DbId) -> StoreResult<Option<Category>>;
    async fn create_category(&self, input: &CreateCategory) -> StoreResult<Category>;
    async fn update_category(
        &self,
        id: DbId,
        input: &UpdateCategory,
    ) -> StoreResult<Option<Category>>;
    /// Delete a category and every product referencing it.
    async fn delete_category(&self, id: DbId) -> StoreResult<bool>;
    async fn count_categories(&self) -> StoreResult<i64>;

    /// Create `names` as categories if and only if there are none yet.
    ///
    /// Atomic with respect to other callers of this method. Returns the rows
    /// created, which is empty when categories already existed.
    async fn seed_categories_if_empty(&self, names: &[String]) -> StoreResult<Vec<Category>>;

    async fn list_products(&self) -> StoreResult<Vec<Product>>;
    async fn find_product(&self, id: DbId) -> StoreResult<Option<Product>>;
    /// Fails with [`StoreError::UnknownCategory`] for a dangling category.
    async fn create_product(&self, input: &CreateProduct) -> StoreResult<Product>;
    /// Fails with [`StoreError::UnknownCategory`] for a dangling category.
    async fn update_product(
        &self,
        id: DbId,
        input: &UpdateProduct,
    ) -> StoreResult<Option<Product>>;
    async fn delete_product(&self, id: DbId) -> StoreResult<bool>;
    async fn count_products(&self) -> StoreResult<i64>;
    /// Every product with its category name, in natural (id) order.
    async fn list_products_for_export(&self) -> StoreResult<Vec<ProductExportRow>>;

    async fn find_user_by_id(&self, id: DbId) -> StoreResult<Option<User>>;
    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;
    /// Fails with [`StoreError::DuplicateUsername`] if the name is taken.
    async fn create_user(&self, input: &CreateUser) -> StoreResult<User>;
}

// ---------------------------------------------------------------------------
// PostgreSQL
// ---------------------------------------------------------------------------

/// [`CatalogStore`] backed by a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgCatalogStore {
    pool: DbPool,
}

impl PgCatalogStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Return the database error code, if `err` came from the server.
fn db_error_code(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().map(|c| c.into_owned()),
        _ => None,
    }
}

/// Translate a foreign key violation on `products.category_id`.
fn map_category_fk(err: sqlx::Error, category_id: Option<DbId>) -> StoreError {
    match (db_error_code(&err).as_deref(), category_id) {
        (Some(FOREIGN_KEY_VIOLATION), Some(id)) => StoreError::UnknownCategory(id),
        _ => StoreError::Database(err),
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn health_check(&self) -> StoreResult<()> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }

    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        Ok(CategoryRepo::list(&self.pool).await?)
    }

    async fn find_category(&self, id: DbId) -> StoreResult<Option<Category>> {
        Ok(CategoryRepo::find_by_id(&self.pool, id).await?)
    }

    async fn create_category(&self, input: &CreateCategory) -> StoreResult<Category> {
        Ok(CategoryRepo::create(&self.pool, input).await?)
    }

    async fn update_category(
        &self,
        id: DbId,
        input: &UpdateCategory,
    ) -> StoreResult<Option<Category>> {
        Ok(CategoryRepo::update(&self.pool, id, input).await?)
    }

    async fn delete_category(&self, id: DbId) -> StoreResult<bool> {
        Ok(CategoryRepo::delete(&self.pool, id).await?)
    }

    async fn count_categories(&self) -> StoreResult<i64> {
        Ok(CategoryRepo::count(&self.pool).await?)
    }

    async fn seed_categories_if_empty(&self, names: &[String]) -> StoreResult<Vec<Category>> {
        Ok(CategoryRepo::seed_if_empty(&self.pool, names).await?)
    }

    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        Ok(ProductRepo::list(&self.pool).await?)
    }

    async fn find_product(&self, id: DbId) -> StoreResult<Option<Product>> {
        Ok(ProductRepo::find_by_id(&self.pool, id).await?)
    }

    async fn create_product(&self, input: &CreateProduct) -> StoreResult<Product> {
        ProductRepo::create(&self.pool, input)
            .await
            .map_err(|e| map_category_fk(e, Some(input.category_id)))
    }

    async fn update_product(
        &self,
        id: DbId,
        input: &UpdateProduct,
    ) -> StoreResult<Option<Product>> {
        ProductRepo::update(&self.pool, id, input)
            .await
            .map_err(|e| map_category_fk(e, input.category_id))
    }

    async fn delete_product(&self, id: DbId) -> StoreResult<bool> {
        Ok(ProductRepo::delete(&self.pool, id).await?)
    }

    async fn count_products(&self) -> StoreResult<i64> {
        Ok(ProductRepo::count(&self.pool).await?)
    }

    async fn list_products_for_export(&self) -> StoreResult<Vec<ProductExportRow>> {
        Ok(ProductRepo::list_for_export(&self.pool).await?)
    }

    async fn find_user_by_id(&self, id: DbId) -> StoreResult<Option<User>> {
        Ok(UserRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(UserRepo::find_by_username(&self.pool, username).await?)
    }

    async fn create_user(&self, input: &CreateUser) -> StoreResult<User> {
        UserRepo::create(&self.pool, input).await.map_err(|e| {
            if db_error_code(&e).as_deref() == Some(UNIQUE_VIOLATION) {
                StoreError::DuplicateUsername(input.username.clone())
            } else {
                StoreError::Database(e)
            }
        })
    }
}
