//! `bound quote` - price a cart file.
//!
//! ```yaml
//! promo: WELCOME10
//! lines:
//!   - slug: classic-oxford-shirt
//!     size: M
//!   - slug: leather-belt
//!     size: "34"
//!     quantity: 2
//! ```

use std::fmt::Write as _;
use std::path::Path;

use bound_core::Price;
use bound_storefront::cart::{Cart, LineSelection};
use bound_storefront::catalog::ProductCatalog;
use serde::Deserialize;
use tracing::info;

use super::{CommandError, Context, emit, read_yaml};

/// A cart described in YAML.
#[derive(Debug, Default, Deserialize)]
pub struct CartFile {
    #[serde(default)]
    pub promo: Option<String>,
    #[serde(default)]
    pub lines: Vec<CartFileLine>,
}

/// One cart line in a cart file.
#[derive(Debug, Deserialize)]
pub struct CartFileLine {
    pub slug: String,
    #[serde(flatten)]
    pub selection: LineSelection,
}

impl CartFile {
    /// Build a cart from the file's lines and promo code.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first line that cannot be added.
    pub fn build(self, context: &Context) -> Result<Cart, CommandError> {
        let mut cart = Cart::new(context.pricing);
        for (index, line) in self.lines.into_iter().enumerate() {
            let product = context
                .catalog
                .find_by_slug(&line.slug)
                .ok_or_else(|| CommandError::UnknownProduct(line.slug.clone()))?;
            cart.add_line(product, line.selection)
                .map_err(|source| CommandError::Cart {
                    line: index + 1,
                    source,
                })?;
        }
        if let Some(code) = &self.promo {
            cart.apply_promo(code);
        }
        Ok(cart)
    }
}

/// Format cart lines and totals as a receipt.
#[must_use]
pub fn render(cart: &Cart) -> String {
    let summary = cart.summary();
    let mut out = String::new();
    for line in cart.lines() {
        let size = line.size.as_deref().unwrap_or("-");
        let total = Price::new(line.line_total(), line.unit_price.currency_code);
        let _ = writeln!(
            out,
            "{:>3} x {:<24} {:<4} {:<7} {:>10}",
            line.quantity,
            line.name,
            size,
            line.color,
            total.display()
        );
    }
    let _ = writeln!(out, "{:>47} {:>10}", "Subtotal", summary.subtotal.display());
    if summary.promo_applied {
        let _ = writeln!(
            out,
            "{:>47} {:>10}",
            format!("Discount ({})", cart.promo().code),
            format!("-{}", summary.discount.display())
        );
    }
    let shipping = if summary.shipping.is_zero() {
        "Free".to_string()
    } else {
        summary.shipping.display()
    };
    let _ = writeln!(out, "{:>47} {:>10}", "Shipping", shipping);
    let _ = write!(out, "{:>47} {:>10}", "Total", summary.total.display());
    out
}

/// Price a cart file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or a line is invalid.
pub fn run(context: &Context, path: &Path) -> Result<(), CommandError> {
    let file: CartFile = read_yaml(path)?;
    let cart = file.build(context)?;
    info!(
        lines = cart.lines().len(),
        total = %cart.summary().total,
        "Quoted cart"
    );
    emit(&render(&cart));
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;

    use super::*;
    use crate::commands::test_support::context;

    const REFERENCE_CART: &str = "
promo: WELCOME10
lines:
  - slug: classic-oxford-shirt
    size: M
  - slug: casual-denim-jacket
    size: L
";

    #[test]
    fn test_reference_cart() {
        let file: CartFile = serde_yaml::from_str(REFERENCE_CART).unwrap();
        let cart = file.build(&context()).unwrap();
        assert_eq!(cart.total(), Decimal::from_str("188.982").unwrap());

        let out = render(&cart);
        assert!(out.contains("Discount (WELCOME10)"));
        assert!(out.contains("-$21.00"));
        assert!(out.contains("Free"));
        assert!(out.lines().last().unwrap().ends_with("$188.98"));
    }

    #[test]
    fn test_quantities_and_flat_shipping() {
        let file: CartFile = serde_yaml::from_str(
            "
lines:
  - slug: leather-belt
    size: \"34\"
    quantity: 1
",
        )
        .unwrap();
        let cart = file.build(&context()).unwrap();
        let out = render(&cart);
        assert!(out.contains("$5.99"));
        assert!(!out.contains("Discount"));
        assert!(out.ends_with("$65.98"));
    }

    #[test]
    fn test_errors_name_the_line() {
        let file: CartFile = serde_yaml::from_str(
            "
lines:
  - slug: premium-leather-watch
  - slug: premium-sneakers
",
        )
        .unwrap();
        let err = file.build(&context()).unwrap_err();
        assert!(matches!(err, CommandError::Cart { line: 2, .. }));

        let file: CartFile = serde_yaml::from_str("lines: [{ slug: cape }]").unwrap();
        assert!(matches!(
            file.build(&context()),
            Err(CommandError::UnknownProduct(_))
        ));
    }
}
