//! Core types for GLOWISHII.
//!
//! This module provides type-safe wrappers for common domain concepts and
//! the entity shapes returned by the shop API.

pub mod address;
pub mod email;
pub mod id;
pub mod order;
pub mod price;
pub mod product;
pub mod status;
pub mod user;

pub use address::{Address, AddressError};
pub use email::{Email, EmailError};
pub use id::*;
pub use order::{NewOrder, NewOrderError, Order, OrderItem, Payment};
pub use price::Price;
pub use product::{Product, ProductStatus, Review};
pub use status::*;
pub use user::{Gender, User};
