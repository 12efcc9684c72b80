//! Session-backed models for the storefront.
//!
//! Business data (products, carts, orders, users) lives in the shop API and
//! uses the types from `glowishii-core`. Only what the storefront keeps per
//! visitor is defined here.

pub mod session;

pub use session::{CurrentUser, Flash, FlashKind, keys as session_keys};
