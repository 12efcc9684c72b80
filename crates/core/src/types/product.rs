//! Catalog product shape.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize};

use super::id::{ProductId, UserId};
use super::price::Price;

/// A candle as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub discounted_price: Option<Price>,
    /// Burn time in hours. Older records store it as a string.
    #[serde(default, deserialize_with = "string_or_number")]
    pub burn_time: Option<String>,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub fragrances: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    /// Featured on the home page.
    #[serde(default)]
    pub special: bool,
    #[serde(default)]
    pub avg_rating: f64,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A customer review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub user_id: UserId,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub ratings: f64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Listing status shown in the admin product table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductStatus {
    Active,
    Inactive,
}

impl ProductStatus {
    /// Label for display.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

const fn default_in_stock() -> bool {
    true
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(f64),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Raw::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

impl Product {
    /// The price a customer pays for one unit.
    ///
    /// The discounted price applies when it is set and strictly between zero
    /// and the list price.
    #[must_use]
    pub fn effective_price(&self) -> Price {
        match self.discounted_price {
            Some(discounted) if discounted.is_positive() && discounted < self.price => discounted,
            _ => self.price,
        }
    }

    /// Whether a discount applies.
    #[must_use]
    pub fn has_discount(&self) -> bool {
        self.effective_price() != self.price
    }

    /// Discount as a whole percentage of the list price, rounded half up.
    ///
    /// Zero when no discount applies.
    #[must_use]
    pub fn discount_percentage(&self) -> u32 {
        if !self.has_discount() || !self.price.is_positive() {
            return 0;
        }
        let list = self.price.amount();
        let saved = list - self.effective_price().amount();
        (saved / list * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u32()
            .unwrap_or(0)
    }

    /// Listing status derived from stock.
    #[must_use]
    pub const fn status(&self) -> ProductStatus {
        if self.in_stock {
            ProductStatus::Active
        } else {
            ProductStatus::Inactive
        }
    }

    /// Number of filled stars (0-5) for the average rating.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to 0..=5
    pub fn filled_stars(&self) -> u8 {
        self.avg_rating.clamp(0.0, 5.0).floor() as u8
    }

    /// The first image, used for thumbnails.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}
