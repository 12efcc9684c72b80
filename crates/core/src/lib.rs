//! GLOWISHII Core - Shared domain types.
//!
//! This crate provides the types used by every GLOWISHII component:
//! - `storefront` - Server-rendered shop and admin back-office
//! - `cli` - Operator tools for the session store, catalog and orders
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients, no sessions. The remote shop API is the source of truth for
//! products, carts, orders and users; these types mirror its shapes.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, emails, statuses and the entity shapes
//! - [`cart`] - The cart ledger (quantities and derived totals)
//! - [`catalog`] - Product listing search, filtering and sorting
//! - [`forms`] - Validation of user-submitted drafts

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod forms;
pub mod types;

pub use cart::{Cart, CartLine};
pub use catalog::{ProductQuery, SortOrder};
pub use forms::{
    AccountFormError, Credentials, OtpCode, ProductDraft, ProductForm, ProductFormError, SignupDraft,
};
pub use types::*;
