//! Product entity model and DTOs.

use std::borrow::Borrow;

use ecom_core::export::{format_price, format_status, format_timestamp};
use ecom_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

/// A row from the `products` table.
///
/// The category reference is exposed to API clients as `category`.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    #[serde(rename = "category")]
    pub category_id: DbId,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub status: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a product, also used as the full-replacement body of `PUT`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProduct {
    #[serde(rename = "category")]
    pub category_id: DbId,
    #[validate(length(min = 1, max = 255, message = "must be 1 to 255 characters"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[validate(
        range(min = 0.0, message = "must not be negative"),
        custom(function = "validate_cents")
    )]
    pub price: f64,
    /// Defaults to `true` if omitted.
    pub status: Option<bool>,
}

/// DTO for partially updating a product. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProduct {
    #[serde(rename = "category")]
    pub category_id: Option<DbId>,
    #[validate(length(min = 1, max = 255, message = "must be 1 to 255 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(
        range(min = 0.0, message = "must not be negative"),
        custom(function = "validate_cents")
    )]
    pub price: Option<f64>,
    pub status: Option<bool>,
}

impl From<CreateProduct> for UpdateProduct {
    fn from(input: CreateProduct) -> Self {
        Self {
            category_id: Some(input.category_id),
            title: Some(input.title),
            description: Some(input.description),
            price: Some(input.price),
            status: Some(input.status.unwrap_or(true)),
        }
    }
}

/// Prices are stored and exported in whole cents.
fn validate_cents<P: Borrow<f64>>(price: P) -> Result<(), ValidationError> {
    let cents = price.borrow() * 100.0;
    if (cents - cents.round()).abs() > 1e-6 {
        let mut err = ValidationError::new("cents");
        err.message = Some("must have at most two decimal places".into());
        return Err(err);
    }
    Ok(())
}

/// A product joined with its category name, one per export line.
#[derive(Debug, Clone, FromRow)]
pub struct ProductExportRow {
    pub id: DbId,
    pub category_name: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub status: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ProductExportRow {
    /// Field values in `PRODUCT_CSV_HEADER` order, unescaped.
    pub fn csv_fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.category_name.clone(),
            self.title.clone(),
            self.description.clone(),
            format_price(self.price),
            format_status(self.status).to_string(),
            format_timestamp(&self.created_at),
            format_timestamp(&self.updated_at),
        ]
    }
}
