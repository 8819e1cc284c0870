//! End-to-end shopping flow through the library.
//!
//! Browse the catalog, fill a cart, apply a promo and walk the checkout
//! wizard to a placed order.

#![allow(clippy::unwrap_used)]

use std::str::FromStr;

use bound_core::{CheckoutStep, OrderNumber, PaymentMethod};
use bound_storefront::cart::{Cart, LineSelection, PricingRules};
use bound_storefront::catalog::{
    Facet, FilterSelection, PricePreset, ProductCatalog, SortOption, StaticCatalog,
    filter_and_sort,
};
use bound_storefront::checkout::{
    CardDetails, Checkout, CheckoutError, ContactInfo, PaymentInfo, ShippingInfo,
};
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn contact() -> ContactInfo {
    ContactInfo {
        email: "jordan@example.com".to_string(),
        phone: "5035550100".to_string(),
        save_info: true,
    }
}

fn shipping() -> ShippingInfo {
    ShippingInfo {
        first_name: "Jordan".to_string(),
        last_name: "Lee".to_string(),
        address: "500 Market St".to_string(),
        city: "San Francisco".to_string(),
        state: "CA".to_string(),
        zip: "94105".to_string(),
        ..ShippingInfo::default()
    }
}

fn card_payment() -> PaymentInfo {
    PaymentInfo {
        method: PaymentMethod::CreditCard,
        card: CardDetails {
            number: "4111 1111 1111 1111".to_string(),
            name: "Jordan Lee".to_string(),
            expiry: "08/28".to_string(),
            cvv: "737".to_string(),
        },
        upi_id: String::new(),
    }
}

// =============================================================================
// Full Flow
// =============================================================================

#[test]
fn test_browse_to_order() {
    let catalog = StaticCatalog::bound_collection();

    // Browse tops, cheapest first.
    let tops = FilterSelection {
        category: Facet::parse(Some("Tops")),
        ..FilterSelection::default()
    };
    let listing = filter_and_sort(catalog.list_products(), &tops, SortOption::PriceLowHigh);
    let names: Vec<&str> = listing.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Classic Oxford Shirt", "Merino Wool Sweater"]);

    let shirt = catalog.find_by_slug("classic-oxford-shirt").unwrap();
    let jacket = catalog.find_by_slug("casual-denim-jacket").unwrap();

    let mut cart = Cart::new(PricingRules::default());
    cart.add_line(shirt, LineSelection::sized("M")).unwrap();
    cart.add_line(jacket, LineSelection::sized("L")).unwrap();
    assert!(cart.apply_promo("BOUND10"));

    let mut checkout = Checkout::new(cart.summary());
    assert_eq!(checkout.step(), CheckoutStep::Contact);

    // A short phone number keeps the shopper on the contact step.
    checkout
        .update_contact(ContactInfo {
            phone: "12345".to_string(),
            ..contact()
        })
        .unwrap();
    assert!(checkout.next().is_err());
    assert_eq!(checkout.step(), CheckoutStep::Contact);

    checkout.update_contact(contact()).unwrap();
    assert_eq!(checkout.next(), Ok(CheckoutStep::Shipping));
    checkout.update_shipping(shipping()).unwrap();
    assert_eq!(checkout.next(), Ok(CheckoutStep::Payment));
    checkout.update_payment(card_payment()).unwrap();

    checkout.refresh_summary(cart.summary());
    assert_eq!(checkout.next(), Ok(CheckoutStep::Complete));

    let confirmation = checkout.confirmation().unwrap();
    assert_eq!(confirmation.email, "jordan@example.com");
    assert_eq!(confirmation.summary.subtotal.amount, dec("209.98"));
    assert_eq!(confirmation.summary.shipping.amount, Decimal::ZERO);
    assert_eq!(confirmation.summary.discount.amount, dec("20.998"));
    assert_eq!(confirmation.summary.total.amount, dec("188.982"));
    assert_eq!(confirmation.summary.discount.display(), "$21.00");
    assert_eq!(confirmation.summary.total.display(), "$188.98");
    assert!(OrderNumber::parse(confirmation.order_number.as_str()).is_ok());
    assert!(confirmation.order_number.to_string().starts_with("#BND"));

    // The wizard never touches the cart.
    assert_eq!(cart.item_count(), 2);
    cart.clear();
    assert!(cart.is_empty());
}

#[test]
fn test_back_and_forth_keeps_forms() {
    let mut checkout = Checkout::new(Cart::default().summary());
    checkout.update_contact(contact()).unwrap();
    checkout.next().unwrap();
    checkout.update_shipping(shipping()).unwrap();

    assert_eq!(checkout.back(), Ok(CheckoutStep::Contact));
    assert_eq!(checkout.contact(), &contact());
    assert_eq!(checkout.next(), Ok(CheckoutStep::Shipping));
    assert_eq!(checkout.shipping(), &shipping());
}

#[test]
fn test_placed_order_is_final() {
    let mut checkout = Checkout::new(Cart::default().summary());
    checkout.update_contact(contact()).unwrap();
    checkout.next().unwrap();
    checkout.update_shipping(shipping()).unwrap();
    checkout.next().unwrap();
    checkout
        .update_payment(PaymentInfo {
            method: PaymentMethod::PayPal,
            ..PaymentInfo::default()
        })
        .unwrap();
    checkout.next().unwrap();

    assert_eq!(checkout.next(), Err(CheckoutError::AlreadyComplete));
    assert_eq!(checkout.back(), Err(CheckoutError::AlreadyComplete));
    assert_eq!(
        checkout.update_payment(card_payment()),
        Err(CheckoutError::AlreadyComplete)
    );
}

// =============================================================================
// Cart Properties
// =============================================================================

#[test]
fn test_quantity_stays_positive_under_any_deltas() {
    let catalog = StaticCatalog::bound_collection();
    let watch = catalog.find_by_slug("premium-leather-watch").unwrap();
    let mut cart = Cart::default();
    let id = cart.add_line(watch, LineSelection::default()).unwrap();

    for delta in [-1, -5, 3, -2, -2, 10, -100, 1, i32::MIN, 0] {
        let quantity = cart.update_quantity(id, delta).unwrap();
        assert!(quantity >= 1, "delta {delta} gave {quantity}");
    }
}

#[test]
fn test_subtotal_tracks_every_line() {
    let catalog = StaticCatalog::bound_collection();
    let mut cart = Cart::default();

    let mut expected = Decimal::ZERO;
    for product in catalog.list_products() {
        let selection = product
            .sizes
            .first()
            .map_or_else(LineSelection::default, |size| LineSelection::sized(size.clone()));
        let id = cart.add_line(product, selection).unwrap();
        expected += product.price.amount;
        assert_eq!(cart.subtotal(), expected);
        assert_eq!(cart.line(id).unwrap().line_total(), product.price.amount);
    }
    assert_eq!(cart.lines().len(), catalog.len());

    let first = cart.lines().first().unwrap().id;
    let removed = cart.remove_line(first).unwrap();
    assert_eq!(cart.subtotal(), expected - removed.line_total());
}

#[test]
fn test_free_shipping_boundary_with_catalog_items() {
    let catalog = StaticCatalog::bound_collection();
    let chinos = catalog.find_by_slug("slim-fit-chinos").unwrap();
    let mut cart = Cart::default();
    let id = cart.add_line(chinos, LineSelection::sized("32")).unwrap();

    // 69.99
    assert_eq!(cart.shipping(), dec("5.99"));
    assert_eq!(cart.total(), dec("75.98"));

    // 139.98
    cart.update_quantity(id, 1).unwrap();
    assert_eq!(cart.shipping(), Decimal::ZERO);
    assert_eq!(cart.total(), dec("139.98"));
}

// =============================================================================
// Catalog Properties
// =============================================================================

#[test]
fn test_filters_narrow_by_intersection() {
    let catalog = StaticCatalog::bound_collection();
    let products = catalog.list_products();

    let accessories = FilterSelection {
        category: Facet::parse(Some("accessories")),
        ..FilterSelection::default()
    };
    let all_accessories = filter_and_sort(products, &accessories, SortOption::Featured);
    assert_eq!(all_accessories.len(), 3);

    let brown = FilterSelection {
        color: Facet::parse(Some("BROWN")),
        ..accessories.clone()
    };
    let brown_accessories = filter_and_sort(products, &brown, SortOption::Featured);
    assert_eq!(brown_accessories.len(), 2);
    assert!(
        brown_accessories
            .iter()
            .all(|p| all_accessories.iter().any(|q| q.id == p.id))
    );

    let cheap = FilterSelection {
        price: PricePreset::From50To100.range(),
        ..brown
    };
    let names: Vec<&str> = filter_and_sort(products, &cheap, SortOption::Featured)
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, vec!["Leather Belt"]);
}

#[test]
fn test_over_150_is_empty_for_built_in_collection() {
    let catalog = StaticCatalog::bound_collection();
    let filter = FilterSelection {
        price: PricePreset::Over150.range(),
        ..FilterSelection::default()
    };
    assert!(filter_and_sort(catalog.list_products(), &filter, SortOption::NameAZ).is_empty());
}
