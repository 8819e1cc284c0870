//! Session-stored cart and checkout.
//!
//! Each visitor's [`Cart`] and [`Checkout`] are serialized into their
//! session. Handlers load a value, apply one transition and write it back.

use tower_sessions::Session;

use crate::cart::Cart;
use crate::checkout::Checkout;
use crate::error::Result;
use crate::state::AppState;

/// Session keys for storefront data.
pub mod keys {
    /// Key for the visitor's cart.
    pub const CART: &str = "cart";

    /// Key for the visitor's checkout in progress (or last placed order).
    pub const CHECKOUT: &str = "checkout";
}

/// Load the cart, or a new empty one priced with the configured rules.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn load_cart(session: &Session, state: &AppState) -> Result<Cart> {
    Ok(session
        .get::<Cart>(keys::CART)
        .await?
        .unwrap_or_else(|| state.new_cart()))
}

/// Store the cart.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    session.insert(keys::CART, cart).await?;
    Ok(())
}

/// Load the checkout, if one was started.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn load_checkout(session: &Session) -> Result<Option<Checkout>> {
    Ok(session.get::<Checkout>(keys::CHECKOUT).await?)
}

/// Store the checkout.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn save_checkout(session: &Session, checkout: &Checkout) -> Result<()> {
    session.insert(keys::CHECKOUT, checkout).await?;
    Ok(())
}
