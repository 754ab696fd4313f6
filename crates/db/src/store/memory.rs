//! In-process [`CatalogStore`] for tests.
//!
//! Mirrors the PostgreSQL semantics the rest of the workspace relies on:
//! ascending ids, cascade on category delete, foreign key checks on product
//! writes, unique usernames, and `updated_at` refresh on update.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use ecom_core::types::DbId;
use tokio::sync::RwLock;

use super::{CatalogStore, StoreError, StoreResult};
use crate::models::category::{Category, CreateCategory, UpdateCategory};
use crate::models::product::{CreateProduct, Product, ProductExportRow, UpdateProduct};
use crate::models::user::{CreateUser, User};

#[derive(Debug, Default)]
struct Tables {
    categories: BTreeMap<DbId, Category>,
    products: BTreeMap<DbId, Product>,
    users: BTreeMap<DbId, User>,
    next_category_id: DbId,
    next_product_id: DbId,
    next_user_id: DbId,
}

impl Tables {
    fn insert_category(&mut self, name: &str) -> Category {
        self.next_category_id += 1;
        let category = Category {
            id: self.next_category_id,
            name: name.to_string(),
        };
        self.categories.insert(category.id, category.clone());
        category
    }
}

/// Catalog store holding every table in memory behind one lock.
#[derive(Debug, Default)]
pub struct MemoryCatalogStore {
    tables: RwLock<Tables>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        Ok(self.tables.read().await.categories.values().cloned().collect())
    }

    async fn find_category(&self, id: DbId) -> StoreResult<Option<Category>> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn create_category(&self, input: &CreateCategory) -> StoreResult<Category> {
        Ok(self.tables.write().await.insert_category(&input.name))
    }

    async fn update_category(
        &self,
        id: DbId,
        input: &UpdateCategory,
    ) -> StoreResult<Option<Category>> {
        let mut tables = self.tables.write().await;
        let Some(category) = tables.categories.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &input.name {
            category.name = name.clone();
        }
        Ok(Some(category.clone()))
    }

    async fn delete_category(&self, id: DbId) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.categories.remove(&id).is_none() {
            return Ok(false);
        }
        tables.products.retain(|_, p| p.category_id != id);
        Ok(true)
    }

    async fn count_categories(&self) -> StoreResult<i64> {
        Ok(self.tables.read().await.categories.len() as i64)
    }

    async fn seed_categories_if_empty(&self, names: &[String]) -> StoreResult<Vec<Category>> {
        let mut tables = self.tables.write().await;
        if !tables.categories.is_empty() {
            return Ok(Vec::new());
        }
        Ok(names.iter().map(|n| tables.insert_category(n)).collect())
    }

    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        Ok(self.tables.read().await.products.values().cloned().collect())
    }

    async fn find_product(&self, id: DbId) -> StoreResult<Option<Product>> {
        Ok(self.tables.read().await.products.get(&id).cloned())
    }

    async fn create_product(&self, input: &CreateProduct) -> StoreResult<Product> {
        let mut tables = self.tables.write().await;
        if !tables.categories.contains_key(&input.category_id) {
            return Err(StoreError::UnknownCategory(input.category_id));
        }
        tables.next_product_id += 1;
        let now = Utc::now();
        let product = Product {
            id: tables.next_product_id,
            category_id: input.category_id,
            title: input.title.clone(),
            description: input.description.clone(),
            price: input.price,
            status: input.status.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        tables.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        id: DbId,
        input: &UpdateProduct,
    ) -> StoreResult<Option<Product>> {
        let mut tables = self.tables.write().await;
        if !tables.products.contains_key(&id) {
            return Ok(None);
        }
        if let Some(category_id) = input.category_id {
            if !tables.categories.contains_key(&category_id) {
                return Err(StoreError::UnknownCategory(category_id));
            }
        }
        let Some(product) = tables.products.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(category_id) = input.category_id {
            product.category_id = category_id;
        }
        if let Some(title) = &input.title {
            product.title = title.clone();
        }
        if let Some(description) = &input.description {
            product.description = description.clone();
        }
        if let Some(price) = input.price {
            product.price = price;
        }
        if let Some(status) = input.status {
            product.status = status;
        }
        product.updated_at = Utc::now();
        Ok(Some(product.clone()))
    }

    async fn delete_product(&self, id: DbId) -> StoreResult<bool> {
        Ok(self.tables.write().await.products.remove(&id).is_some())
    }

    async fn count_products(&self) -> StoreResult<i64> {
        Ok(self.tables.read().await.products.len() as i64)
    }

    async fn list_products_for_export(&self) -> StoreResult<Vec<ProductExportRow>> {
        let tables = self.tables.read().await;
        let rows = tables
            .products
            .values()
            .filter_map(|p| {
                let category = tables.categories.get(&p.category_id)?;
                Some(ProductExportRow {
                    id: p.id,
                    category_name: category.name.clone(),
                    title: p.title.clone(),
                    description: p.description.clone(),
                    price: p.price,
                    status: p.status,
                    created_at: p.created_at,
                    updated_at: p.updated_at,
                })
            })
            .collect();
        Ok(rows)
    }

    async fn find_user_by_id(&self, id: DbId) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create_user(&self, input: &CreateUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == input.username) {
            return Err(StoreError::DuplicateUsername(input.username.clone()));
        }
        tables.next_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: tables.next_user_id,
            username: input.username.clone(),
            password_hash: input.password_hash.clone(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn product(category_id: DbId, title: &str) -> CreateProduct {
        CreateProduct {
            category_id,
            title: title.to_string(),
            description: String::new(),
            price: 10.0,
            status: None,
        }
    }

    #[tokio::test]
    async fn product_requires_existing_category() {
        let store = MemoryCatalogStore::new();
        let err = store.create_product(&product(99, "Orphan")).await.unwrap_err();
        assert_matches!(err, StoreError::UnknownCategory(99));
    }

    #[tokio::test]
    async fn updating_missing_product_is_none_even_with_unknown_category() {
        let store = MemoryCatalogStore::new();
        let input = UpdateProduct {
            category_id: Some(99),
            ..Default::default()
        };
        assert_eq!(store.update_product(42, &input).await.unwrap(), None);
    }

    #[tokio::test]
    async fn deleting_category_cascades_to_products() {
        let store = MemoryCatalogStore::new();
        let keep = store
            .create_category(&CreateCategory { name: "Keep".into() })
            .await
            .unwrap();
        let drop = store
            .create_category(&CreateCategory { name: "Drop".into() })
            .await
            .unwrap();
        store.create_product(&product(keep.id, "A")).await.unwrap();
        store.create_product(&product(drop.id, "B")).await.unwrap();

        assert!(store.delete_category(drop.id).await.unwrap());

        let remaining = store.list_products().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].category_id, keep.id);
    }

    #[tokio::test]
    async fn seeding_happens_once() {
        let store = MemoryCatalogStore::new();
        let names = vec!["One".to_string(), "Two".to_string()];

        let first = store.seed_categories_if_empty(&names).await.unwrap();
        let second = store.seed_categories_if_empty(&names).await.unwrap();

        assert_eq!(first.len(), 2);
        assert!(second.is_empty());
        assert_eq!(store.count_categories().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let store = MemoryCatalogStore::new();
        let input = CreateUser {
            username: "admin".into(),
            password_hash: "hash".into(),
        };
        store.create_user(&input).await.unwrap();
        assert_matches!(
            store.create_user(&input).await,
            Err(StoreError::DuplicateUsername(name)) if name == "admin"
        );
    }
}
