//! Rules for synthetic catalog data.
//!
//! Pure functions and constants used by the generation runner. Randomness is
//! always injected so the rules can be exercised with a seeded RNG.

use rand::Rng;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Number of products generated when the caller does not ask for a count.
pub const DEFAULT_PRODUCT_COUNT: u32 = 1000;

/// Number of categories created when the catalog has none.
pub const SEED_CATEGORY_COUNT: u32 = 10;

/// Description given to every generated product.
pub const DUMMY_DESCRIPTION: &str = "Product description";

/// Lower bound (inclusive) of generated prices.
pub const MIN_PRICE: f64 = 10.0;

/// Upper bound (exclusive) of generated prices.
pub const MAX_PRICE: f64 = 100.0;

/// Generated titles are `"Product N"` with `N` in `1..=MAX_TITLE_SUFFIX`.
pub const MAX_TITLE_SUFFIX: u32 = 1000;

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

/// Names of the categories created on an empty catalog, `"Category 1"` onwards.
pub fn seed_category_names() -> Vec<String> {
    (1..=SEED_CATEGORY_COUNT)
        .map(|i| format!("Category {i}"))
        .collect()
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

/// Field values for one generated product. The category is chosen by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct DummyProduct {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub status: bool,
}

/// Draw the field values of one generated product.
pub fn dummy_product<R: Rng + ?Sized>(rng: &mut R) -> DummyProduct {
    let suffix = rng.random_range(1..=MAX_TITLE_SUFFIX);
    let price = rng.random_range(MIN_PRICE..MAX_PRICE);

    DummyProduct {
        title: format!("Product {suffix}"),
        description: DUMMY_DESCRIPTION.to_string(),
        price: round_to_cents(price),
        status: true,
    }
}

/// Round to two decimals, never reaching [`MAX_PRICE`].
fn round_to_cents(price: f64) -> f64 {
    let rounded = (price * 100.0).floor() / 100.0;
    rounded.clamp(MIN_PRICE, MAX_PRICE - 0.01)
}

/// Pick an index uniformly in `0..len`. Returns `None` for an empty slice.
pub fn pick_index<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Option<usize> {
    if len == 0 {
        None
    } else {
        Some(rng.random_range(0..len))
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a requested product count against the configured ceiling.
pub fn validate_product_count(count: i64, max: u32) -> Result<u32, CoreError> {
    if count < 1 {
        return Err(CoreError::Validation(
            "number must be at least 1".to_string(),
        ));
    }
    if count > i64::from(max) {
        return Err(CoreError::Validation(format!(
            "number must not exceed {max}"
        )));
    }
    Ok(count as u32)
}
