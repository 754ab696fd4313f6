//! Category entity model and DTOs.

use ecom_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `categories` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
}

/// DTO for creating a category, also used as the full-replacement body of `PUT`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCategory {
    #[validate(length(min = 1, max = 255, message = "must be 1 to 255 characters"))]
    pub name: String,
}

/// DTO for partially updating a category.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCategory {
    #[validate(length(min = 1, max = 255, message = "must be 1 to 255 characters"))]
    pub name: Option<String>,
}

impl From<CreateCategory> for UpdateCategory {
    fn from(input: CreateCategory) -> Self {
        Self {
            name: Some(input.name),
        }
    }
}
