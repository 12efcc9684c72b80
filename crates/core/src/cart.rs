//! The cart ledger.
//!
//! A visitor's cart lives on the shop API; this ledger is the copy kept in
//! the session so pages can show counts and totals without a round trip.
//! Every mutation keeps `line_total == quantity × unit_price` for each line
//! and recomputes the cart totals from the lines.

use serde::{Deserialize, Serialize};

use crate::types::{Price, Product, ProductId};

/// One product in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub fragrances: Vec<String>,
    pub image: Option<String>,
    pub unit_price: Price,
    pub in_stock: bool,
    pub quantity: u32,
    pub line_total: Price,
}

impl CartLine {
    /// A line for `quantity` units of `product` at its effective price.
    ///
    /// A zero quantity is raised to one.
    #[must_use]
    pub fn new(product: &Product, quantity: u32) -> Self {
        let unit_price = product.effective_price();
        let quantity = quantity.max(1);
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            fragrances: product.fragrances.clone(),
            image: product.primary_image().map(str::to_string),
            unit_price,
            in_stock: product.in_stock,
            quantity,
            line_total: unit_price * quantity,
        }
    }

    fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
        self.line_total = self.unit_price * quantity;
    }
}

/// The cart ledger.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
    item_count: u32,
    total: Price,
}

impl Cart {
    /// Build a ledger from lines, merging duplicate products.
    #[must_use]
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut cart = Self::default();
        cart.set(lines);
        cart
    }

    /// Replace the whole ledger, e.g. with the server's view.
    ///
    /// Lines with quantity zero are dropped and repeated product ids are
    /// merged into the first occurrence.
    pub fn set(&mut self, lines: impl IntoIterator<Item = CartLine>) {
        self.lines.clear();
        for mut line in lines {
            if line.quantity == 0 {
                continue;
            }
            if let Some(existing) = self.line_mut(&line.product_id) {
                let quantity = existing.quantity.saturating_add(line.quantity);
                existing.set_quantity(quantity);
            } else {
                line.set_quantity(line.quantity);
                self.lines.push(line);
            }
        }
        self.recompute();
    }

    /// Add `quantity` units of `product`.
    pub fn add(&mut self, product: &Product, quantity: u32) {
        if quantity == 0 {
            return;
        }
        if let Some(line) = self.line_mut(&product.id) {
            let quantity = line.quantity.saturating_add(quantity);
            line.set_quantity(quantity);
        } else {
            self.lines.push(CartLine::new(product, quantity));
        }
        self.recompute();
    }

    /// One more unit of an existing line. Unknown ids are ignored.
    pub fn increment(&mut self, product_id: &ProductId) {
        if let Some(line) = self.line_mut(product_id) {
            let quantity = line.quantity.saturating_add(1);
            line.set_quantity(quantity);
            self.recompute();
        }
    }

    /// One fewer unit; the line is removed when it reaches zero.
    pub fn decrement(&mut self, product_id: &ProductId) {
        let Some(line) = self.line_mut(product_id) else {
            return;
        };
        if line.quantity <= 1 {
            self.remove(product_id);
        } else {
            let quantity = line.quantity - 1;
            line.set_quantity(quantity);
            self.recompute();
        }
    }

    /// Drop a line entirely.
    pub fn remove(&mut self, product_id: &ProductId) {
        self.lines.retain(|line| &line.product_id != product_id);
        self.recompute();
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.recompute();
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.product_id == product_id)
    }

    /// Total number of units.
    #[must_use]
    pub const fn item_count(&self) -> u32 {
        self.item_count
    }

    /// Sum of all line totals.
    #[must_use]
    pub const fn total(&self) -> Price {
        self.total
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn line_mut(&mut self, product_id: &ProductId) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| &line.product_id == product_id)
    }

    fn recompute(&mut self) {
        self.item_count = self.lines.iter().map(|line| line.quantity).sum();
        self.total = self.lines.iter().map(|line| line.line_total).sum();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::product::tests::candle;

    fn assert_consistent(cart: &Cart) {
        for line in cart.lines() {
            assert!(line.quantity > 0);
            assert_eq!(line.line_total, line.unit_price * line.quantity);
        }
        let total: Price = cart.lines().iter().map(|l| l.line_total).sum();
        let count: u32 = cart.lines().iter().map(|l| l.quantity).sum();
        assert_eq!(cart.total(), total);
        assert_eq!(cart.item_count(), count);
    }

    #[test]
    fn test_add_creates_then_increments() {
        let amber = candle("p1", "Amber", 500, Some(450));
        let mut cart = Cart::default();
        cart.add(&amber, 1);
        cart.add(&amber, 2);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.total(), Price::from_rupees(1350));
        assert_consistent(&cart);
    }

    #[test]
    fn test_add_zero_is_noop() {
        let mut cart = Cart::default();
        cart.add(&candle("p1", "Amber", 500, None), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_decrement_removes_last_unit() {
        let id = ProductId::new("p1");
        let mut cart = Cart::default();
        cart.add(&candle("p1", "Amber", 300, None), 2);

        cart.decrement(&id);
        assert_eq!(cart.line(&id).unwrap().quantity, 1);
        assert_eq!(cart.total(), Price::from_rupees(300));

        cart.decrement(&id);
        assert!(cart.line(&id).is_none());
        assert_eq!(cart.total(), Price::ZERO);
        assert_consistent(&cart);
    }

    #[test]
    fn test_unknown_ids_are_ignored() {
        let mut cart = Cart::default();
        cart.add(&candle("p1", "Amber", 300, None), 1);
        let before = cart.clone();

        cart.increment(&ProductId::new("nope"));
        cart.decrement(&ProductId::new("nope"));
        cart.remove(&ProductId::new("nope"));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_mixed_operations_keep_totals_consistent() {
        let mut cart = Cart::default();
        let amber = candle("p1", "Amber", 499, None);
        let rose = candle("p2", "Rose", 1200, Some(999));
        let cedar = candle("p3", "Cedar", 250, None);

        cart.add(&amber, 2);
        cart.add(&rose, 1);
        cart.increment(&rose.id);
        cart.add(&cedar, 4);
        assert_consistent(&cart);
        cart.decrement(&cedar.id);
        cart.remove(&amber.id);
        assert_consistent(&cart);

        assert_eq!(cart.item_count(), 5);
        assert_eq!(cart.total(), Price::from_rupees(999 * 2 + 250 * 3));
    }

    #[test]
    fn test_set_merges_and_recomputes() {
        let amber = candle("p1", "Amber", 100, None);
        let mut stale = CartLine::new(&amber, 2);
        // a server line total that does not match quantity × price
        stale.line_total = Price::from_rupees(7);

        let cart = Cart::from_lines([
            stale,
            CartLine::new(&amber, 1),
            CartLine {
                quantity: 0,
                ..CartLine::new(&candle("p2", "Rose", 50, None), 1)
            },
        ]);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.total(), Price::from_rupees(300));
        assert_consistent(&cart);
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::default();
        cart.add(&candle("p1", "Amber", 100, None), 3);
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
        assert_eq!(cart.total(), Price::ZERO);
    }

    #[test]
    fn test_session_round_trip_keeps_totals() {
        let mut cart = Cart::default();
        cart.add(&candle("p1", "Amber", 100, None), 3);
        let json = serde_json::to_string(&cart).unwrap();
        let restored: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cart);
    }
}
