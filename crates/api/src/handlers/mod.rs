pub mod auth;
pub mod category;
pub mod generation;
pub mod health;
pub mod product;
