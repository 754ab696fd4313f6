//! Repository tests against a real PostgreSQL database.
//!
//! Run with `DATABASE_URL` pointing at a scratch server and `--ignored`.

use assert_matches::assert_matches;
use ecom_db::models::category::{CreateCategory, UpdateCategory};
use ecom_db::models::product::{CreateProduct, UpdateProduct};
use ecom_db::models::user::CreateUser;
use ecom_db::repositories::{CategoryRepo, ProductRepo};
use ecom_db::store::{CatalogStore, PgCatalogStore, StoreError};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_category(name: &str) -> CreateCategory {
    CreateCategory {
        name: name.to_string(),
    }
}

fn new_product(category_id: i64, title: &str, price: f64) -> CreateProduct {
    CreateProduct {
        category_id,
        title: title.to_string(),
        description: "Product description".to_string(),
        price,
        status: None,
    }
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_category_crud(pool: PgPool) {
    let created = CategoryRepo::create(&pool, &new_category("Shoes"))
        .await
        .unwrap();

    let found = CategoryRepo::find_by_id(&pool, created.id)
        .await
        .unwrap()
        .expect("category should exist");
    assert_eq!(found.name, "Shoes");

    let updated = CategoryRepo::update(
        &pool,
        created.id,
        &UpdateCategory {
            name: Some("Boots".to_string()),
        },
    )
    .await
    .unwrap()
    .expect("category should be updated");
    assert_eq!(updated.name, "Boots");

    assert!(CategoryRepo::delete(&pool, created.id).await.unwrap());
    assert!(!CategoryRepo::delete(&pool, created.id).await.unwrap());
    assert!(CategoryRepo::find_by_id(&pool, created.id)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_seed_if_empty_only_once(pool: PgPool) {
    let names: Vec<String> = (1..=3).map(|i| format!("Category {i}")).collect();

    let first = CategoryRepo::seed_if_empty(&pool, &names).await.unwrap();
    let second = CategoryRepo::seed_if_empty(&pool, &names).await.unwrap();

    let created: Vec<&str> = first.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(created, vec!["Category 1", "Category 2", "Category 3"]);
    assert!(second.is_empty());
    assert_eq!(CategoryRepo::count(&pool).await.unwrap(), 3);
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_product_update_refreshes_updated_at(pool: PgPool) {
    let category = CategoryRepo::create(&pool, &new_category("Hats"))
        .await
        .unwrap();
    let product = ProductRepo::create(&pool, &new_product(category.id, "Cap", 12.0))
        .await
        .unwrap();
    assert!(product.status, "status defaults to true");

    let updated = ProductRepo::update(
        &pool,
        product.id,
        &UpdateProduct {
            price: Some(15.5),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .expect("product should be updated");

    assert_eq!(updated.price, 15.5);
    assert_eq!(updated.title, "Cap");
    assert!(updated.updated_at >= product.updated_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_dangling_category_maps_to_unknown_category(pool: PgPool) {
    let store = PgCatalogStore::new(pool);
    let err = store
        .create_product(&new_product(424242, "Ghost", 1.0))
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::UnknownCategory(424242));
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_category_delete_cascades(pool: PgPool) {
    let category = CategoryRepo::create(&pool, &new_category("Bags"))
        .await
        .unwrap();
    ProductRepo::create(&pool, &new_product(category.id, "Tote", 20.0))
        .await
        .unwrap();

    CategoryRepo::delete(&pool, category.id).await.unwrap();
    assert_eq!(ProductRepo::count(&pool).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_export_rows_carry_category_name(pool: PgPool) {
    let a = CategoryRepo::create(&pool, &new_category("Alpha"))
        .await
        .unwrap();
    let b = CategoryRepo::create(&pool, &new_category("Beta"))
        .await
        .unwrap();
    ProductRepo::create(&pool, &new_product(a.id, "One", 1.0))
        .await
        .unwrap();
    ProductRepo::create(&pool, &new_product(b.id, "Two", 2.0))
        .await
        .unwrap();

    let rows = ProductRepo::list_for_export(&pool).await.unwrap();
    let names: Vec<&str> = rows.iter().map(|r| r.category_name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "Beta"]);
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_duplicate_username(pool: PgPool) {
    let store = PgCatalogStore::new(pool);
    let input = CreateUser {
        username: "admin".to_string(),
        password_hash: "not-a-real-hash".to_string(),
    };
    store.create_user(&input).await.unwrap();
    assert_matches!(
        store.create_user(&input).await,
        Err(StoreError::DuplicateUsername(_))
    );
}
