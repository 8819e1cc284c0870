//! Shopping cart and order totals.
//!
//! A [`Cart`] owns its lines and promo state. Every total is derived on read
//! from the current lines, so nothing can go stale between mutations.
//!
//! ```text
//! subtotal = sum(unit_price * quantity)
//! discount = subtotal * promo_rate         (only once a promo is applied)
//! shipping = 0 if subtotal > threshold, else flat_rate
//! total    = max(0, subtotal - discount + shipping)
//! ```

use bound_core::{CartLineId, CurrencyCode, Price, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Product;

/// Errors returned by cart mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("cart line {0} not found")]
    LineNotFound(CartLineId),
    #[error("quantity must be at least 1")]
    InvalidQuantity,
    #[error("a size must be chosen for '{product}'")]
    SizeRequired { product: String },
    #[error("size '{size}' is not offered for '{product}'")]
    UnknownSize { product: String, size: String },
    #[error("'{product}' is sold out")]
    SoldOut { product: String },
    #[error("cart is priced in {expected}, product is priced in {found}")]
    CurrencyMismatch {
        expected: CurrencyCode,
        found: CurrencyCode,
    },
}

/// Shipping and promo parameters used to price a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingRules {
    /// Shipping is free when the subtotal is strictly greater than this.
    pub free_shipping_threshold: Decimal,
    /// Shipping charged otherwise.
    pub flat_shipping_rate: Decimal,
    /// Fraction of the subtotal taken off once a promo is applied.
    pub promo_rate: Decimal,
}

impl PricingRules {
    /// Build a promo rate from a whole percentage (`10` becomes `0.10`).
    #[must_use]
    pub fn percent(percent: Decimal) -> Decimal {
        percent / Decimal::ONE_HUNDRED
    }
}

impl Default for PricingRules {
    fn default() -> Self {
        Self {
            free_shipping_threshold: Decimal::new(100, 0),
            flat_shipping_rate: Decimal::new(599, 2),
            promo_rate: Decimal::new(10, 2),
        }
    }
}

/// One line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: CartLineId,
    pub product_id: ProductId,
    pub slug: String,
    pub name: String,
    pub image: Option<String>,
    pub size: Option<String>,
    pub color: String,
    /// Always at least 1.
    pub quantity: u32,
    /// Price captured when the line was added.
    pub unit_price: Price,
}

impl CartLine {
    /// `unit_price * quantity`, unrounded.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price.amount * Decimal::from(self.quantity)
    }
}

/// Options chosen on the product page when adding to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSelection {
    #[serde(default)]
    pub size: Option<String>,
    /// Defaults to the product's own color.
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

impl Default for LineSelection {
    fn default() -> Self {
        Self {
            size: None,
            color: None,
            quantity: default_quantity(),
        }
    }
}

impl LineSelection {
    /// A single unit in the given size.
    #[must_use]
    pub fn sized(size: impl Into<String>) -> Self {
        Self {
            size: Some(size.into()),
            color: None,
            quantity: 1,
        }
    }
}

/// Promo code state.
///
/// The policy is permissive: any non-blank code is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PromoState {
    pub code: String,
    pub applied: bool,
}

/// Derived order totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub item_count: u32,
    pub subtotal: Price,
    pub discount: Price,
    pub shipping: Price,
    pub total: Price,
    pub promo_applied: bool,
}

/// A shopping cart.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
    promo: PromoState,
    rules: PricingRules,
    next_line_id: i32,
}

impl Cart {
    /// Create an empty cart priced with `rules`.
    #[must_use]
    pub fn new(rules: PricingRules) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn line(&self, id: CartLineId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id == id)
    }

    #[must_use]
    pub const fn promo(&self) -> &PromoState {
        &self.promo
    }

    #[must_use]
    pub const fn rules(&self) -> &PricingRules {
        &self.rules
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Currency of the cart: that of its lines, USD when empty.
    #[must_use]
    pub fn currency(&self) -> CurrencyCode {
        self.lines
            .first()
            .map_or_else(CurrencyCode::default, |line| line.unit_price.currency_code)
    }

    /// Add `product` to the cart.
    ///
    /// A line with the same product, size and color absorbs the quantity
    /// instead of creating a new line. Returns the id of the affected line.
    ///
    /// # Errors
    ///
    /// Returns an error if the quantity is zero, the product is sold out, a
    /// required size is missing or unknown, or the product's currency
    /// differs from the cart's.
    pub fn add_line(
        &mut self,
        product: &Product,
        selection: LineSelection,
    ) -> Result<CartLineId, CartError> {
        if selection.quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }
        if product.is_sold_out() {
            tracing::warn!(product = %product.slug, "Rejected sold out product");
            return Err(CartError::SoldOut {
                product: product.name.clone(),
            });
        }

        let size = match selection.size.map(|s| s.trim().to_string()) {
            Some(size) if !size.is_empty() => {
                if !product.offers_size(&size) {
                    return Err(CartError::UnknownSize {
                        product: product.name.clone(),
                        size,
                    });
                }
                Some(size)
            }
            _ if product.requires_size() => {
                return Err(CartError::SizeRequired {
                    product: product.name.clone(),
                });
            }
            _ => None,
        };

        if !self.is_empty() && product.price.currency_code != self.currency() {
            return Err(CartError::CurrencyMismatch {
                expected: self.currency(),
                found: product.price.currency_code,
            });
        }

        let color = selection
            .color
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| product.color.clone());

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product.id && l.size == size && l.color == color)
        {
            line.quantity = line.quantity.saturating_add(selection.quantity);
            tracing::info!(
                line_id = %line.id,
                product = %product.slug,
                quantity = line.quantity,
                "Merged into existing cart line"
            );
            return Ok(line.id);
        }

        self.next_line_id += 1;
        let id = CartLineId::new(self.next_line_id);
        self.lines.push(CartLine {
            id,
            product_id: product.id,
            slug: product.slug.clone(),
            name: product.name.clone(),
            image: product.primary_image().map(ToString::to_string),
            size,
            color,
            quantity: selection.quantity,
            unit_price: product.price,
        });
        tracing::info!(
            line_id = %id,
            product = %product.slug,
            quantity = selection.quantity,
            "Added cart line"
        );
        Ok(id)
    }

    /// Adjust a line's quantity by `delta`, clamping at 1.
    ///
    /// Never removes the line; use [`Cart::remove_line`] for that. Returns
    /// the new quantity.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] for an unknown line.
    pub fn update_quantity(&mut self, id: CartLineId, delta: i32) -> Result<u32, CartError> {
        let line = self
            .lines
            .iter_mut()
            .find(|line| line.id == id)
            .ok_or(CartError::LineNotFound(id))?;
        let next = (i64::from(line.quantity) + i64::from(delta)).max(1);
        line.quantity = u32::try_from(next).unwrap_or(u32::MAX);
        tracing::debug!(line_id = %id, delta, quantity = line.quantity, "Updated quantity");
        Ok(line.quantity)
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] for an unknown line.
    pub fn remove_line(&mut self, id: CartLineId) -> Result<CartLine, CartError> {
        let index = self
            .lines
            .iter()
            .position(|line| line.id == id)
            .ok_or(CartError::LineNotFound(id))?;
        let line = self.lines.remove(index);
        tracing::info!(line_id = %id, product = %line.slug, "Removed cart line");
        Ok(line)
    }

    /// Apply a promo code. Blank codes are ignored.
    ///
    /// Returns `true` if the code was accepted. An already applied promo
    /// stays applied.
    pub fn apply_promo(&mut self, code: &str) -> bool {
        let code = code.trim();
        if code.is_empty() {
            tracing::debug!("Ignored blank promo code");
            return false;
        }
        self.promo = PromoState {
            code: code.to_string(),
            applied: true,
        };
        tracing::info!(code, "Applied promo code");
        true
    }

    /// Empty the cart and reset the promo. Pricing rules are kept.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.promo = PromoState::default();
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |count, line| count.saturating_add(line.quantity))
    }

    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    #[must_use]
    pub fn discount(&self) -> Decimal {
        if self.promo.applied {
            self.subtotal() * self.rules.promo_rate
        } else {
            Decimal::ZERO
        }
    }

    #[must_use]
    pub fn shipping(&self) -> Decimal {
        if self.subtotal() > self.rules.free_shipping_threshold {
            Decimal::ZERO
        } else {
            self.rules.flat_shipping_rate
        }
    }

    #[must_use]
    pub fn total(&self) -> Decimal {
        (self.subtotal() - self.discount() + self.shipping()).max(Decimal::ZERO)
    }

    /// Snapshot of every derived total.
    #[must_use]
    pub fn summary(&self) -> OrderSummary {
        let currency = self.currency();
        OrderSummary {
            item_count: self.item_count(),
            subtotal: Price::new(self.subtotal(), currency),
            discount: Price::new(self.discount(), currency),
            shipping: Price::new(self.shipping(), currency),
            total: Price::new(self.total(), currency),
            promo_applied: self.promo.applied,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::catalog::{ProductCatalog, StaticCatalog};

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn product(catalog: &StaticCatalog, id: i32) -> Product {
        catalog.find_by_id(ProductId::new(id)).unwrap().clone()
    }

    fn one_size(price: &str) -> Product {
        Product {
            id: ProductId::new(99),
            slug: "gift-card".to_string(),
            name: "Gift Card".to_string(),
            price: Price::new(dec(price), CurrencyCode::USD),
            category: "accessories".to_string(),
            brand: "Bound Essentials".to_string(),
            color: "black".to_string(),
            images: Vec::new(),
            sizes: Vec::new(),
            stock: None,
            fabric: None,
            care: Vec::new(),
        }
    }

    #[test]
    fn test_reference_order_totals() {
        let catalog = StaticCatalog::bound_collection();
        let mut cart = Cart::default();
        cart.add_line(&product(&catalog, 1), LineSelection::sized("M"))
            .unwrap();
        cart.add_line(&product(&catalog, 4), LineSelection::sized("L"))
            .unwrap();

        assert_eq!(cart.subtotal(), dec("209.98"));
        assert_eq!(cart.shipping(), Decimal::ZERO);
        assert_eq!(cart.total(), dec("209.98"));

        assert!(cart.apply_promo("WELCOME10"));
        assert_eq!(cart.discount(), dec("20.998"));
        assert_eq!(cart.total(), dec("188.982"));

        let summary = cart.summary();
        assert_eq!(summary.discount.display(), "$21.00");
        assert_eq!(summary.total.display(), "$188.98");
        assert_eq!(summary.item_count, 2);
        assert!(summary.promo_applied);
    }

    #[test]
    fn test_shipping_threshold_is_strict() {
        let mut cart = Cart::default();
        cart.add_line(&one_size("100.00"), LineSelection::default())
            .unwrap();
        assert_eq!(cart.shipping(), dec("5.99"));
        assert_eq!(cart.total(), dec("105.99"));

        let mut cart = Cart::default();
        cart.add_line(&one_size("100.01"), LineSelection::default())
            .unwrap();
        assert_eq!(cart.shipping(), Decimal::ZERO);
    }

    #[test]
    fn test_blank_promo_is_ignored() {
        let mut cart = Cart::default();
        cart.add_line(&one_size("40.00"), LineSelection::default())
            .unwrap();
        assert!(!cart.apply_promo(""));
        assert!(!cart.apply_promo("   "));
        assert_eq!(cart.discount(), Decimal::ZERO);

        assert!(cart.apply_promo(" anything "));
        assert_eq!(cart.promo().code, "anything");
        assert_eq!(cart.discount(), dec("4.000"));

        assert!(!cart.apply_promo(""));
        assert!(cart.promo().applied);
    }

    #[test]
    fn test_quantity_never_drops_below_one() {
        let mut cart = Cart::default();
        let id = cart
            .add_line(&one_size("10.00"), LineSelection::default())
            .unwrap();

        assert_eq!(cart.update_quantity(id, -1).unwrap(), 1);
        assert_eq!(cart.update_quantity(id, 3).unwrap(), 4);
        assert_eq!(cart.update_quantity(id, -100).unwrap(), 1);
        assert_eq!(cart.update_quantity(id, i32::MIN).unwrap(), 1);
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_add_and_remove_change_subtotal_by_line_total() {
        let catalog = StaticCatalog::bound_collection();
        let mut cart = Cart::default();
        cart.add_line(&product(&catalog, 3), LineSelection::default())
            .unwrap();
        let before = cart.subtotal();

        let id = cart
            .add_line(
                &product(&catalog, 2),
                LineSelection {
                    size: Some("32".to_string()),
                    color: None,
                    quantity: 2,
                },
            )
            .unwrap();
        let line_total = cart.line(id).unwrap().line_total();
        assert_eq!(line_total, dec("139.98"));
        assert_eq!(cart.subtotal(), before + line_total);

        let removed = cart.remove_line(id).unwrap();
        assert_eq!(removed.quantity, 2);
        assert_eq!(cart.subtotal(), before);
    }

    #[test]
    fn test_unknown_line() {
        let mut cart = Cart::default();
        let missing = CartLineId::new(42);
        assert_eq!(
            cart.update_quantity(missing, 1),
            Err(CartError::LineNotFound(missing))
        );
        assert_eq!(
            cart.remove_line(missing),
            Err(CartError::LineNotFound(missing))
        );
    }

    #[test]
    fn test_size_is_required_when_offered() {
        let catalog = StaticCatalog::bound_collection();
        let shirt = product(&catalog, 1);
        let mut cart = Cart::default();

        assert!(matches!(
            cart.add_line(&shirt, LineSelection::default()),
            Err(CartError::SizeRequired { .. })
        ));
        assert!(matches!(
            cart.add_line(&shirt, LineSelection::sized("XXL")),
            Err(CartError::UnknownSize { .. })
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_rejects_zero_quantity_and_sold_out() {
        let mut cart = Cart::default();
        let mut gift = one_size("25.00");
        assert_eq!(
            cart.add_line(
                &gift,
                LineSelection {
                    quantity: 0,
                    ..LineSelection::default()
                }
            ),
            Err(CartError::InvalidQuantity)
        );

        gift.stock = Some(0);
        assert!(matches!(
            cart.add_line(&gift, LineSelection::default()),
            Err(CartError::SoldOut { .. })
        ));
    }

    #[test]
    fn test_same_selection_merges() {
        let catalog = StaticCatalog::bound_collection();
        let shirt = product(&catalog, 1);
        let mut cart = Cart::default();

        let first = cart.add_line(&shirt, LineSelection::sized("M")).unwrap();
        let second = cart.add_line(&shirt, LineSelection::sized("M")).unwrap();
        let other = cart.add_line(&shirt, LineSelection::sized("L")).unwrap();

        assert_eq!(first, second);
        assert_ne!(first, other);
        assert_eq!(cart.line(first).unwrap().quantity, 2);
        assert_eq!(cart.line(first).unwrap().color, "blue");
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_currency_mismatch() {
        let mut cart = Cart::default();
        cart.add_line(&one_size("10.00"), LineSelection::default())
            .unwrap();

        let mut euro = one_size("10.00");
        euro.id = ProductId::new(100);
        euro.price.currency_code = CurrencyCode::EUR;
        assert!(matches!(
            cart.add_line(&euro, LineSelection::default()),
            Err(CartError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn test_clear_keeps_rules() {
        let rules = PricingRules {
            free_shipping_threshold: dec("50"),
            flat_shipping_rate: dec("4.50"),
            promo_rate: PricingRules::percent(dec("20")),
        };
        let mut cart = Cart::new(rules);
        cart.add_line(&one_size("60.00"), LineSelection::default())
            .unwrap();
        cart.apply_promo("SPRING");
        assert_eq!(cart.discount(), dec("12.00"));
        assert_eq!(cart.shipping(), Decimal::ZERO);

        cart.clear();
        assert!(cart.is_empty());
        assert!(!cart.promo().applied);
        assert_eq!(cart.rules(), &rules);
        assert_eq!(cart.shipping(), dec("4.50"));
    }

    #[test]
    fn test_cart_survives_json_roundtrip() {
        let mut cart = Cart::default();
        let id = cart
            .add_line(&one_size("19.99"), LineSelection::default())
            .unwrap();
        cart.apply_promo("X");

        let json = serde_json::to_string(&cart).unwrap();
        let mut restored: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cart);

        // Line ids keep counting after a reload.
        let next = restored
            .add_line(
                &one_size("19.99"),
                LineSelection {
                    color: Some("navy".to_string()),
                    ..LineSelection::default()
                },
            )
            .unwrap();
        assert_ne!(next, id);
    }
}
