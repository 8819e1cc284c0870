//! Order confirmation numbers.

use core::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`OrderNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderNumberError {
    #[error("order number must start with {prefix}")]
    MissingPrefix { prefix: &'static str },
    #[error("order number must end with {digits} digits")]
    InvalidDigits { digits: usize },
}

/// A shopper-facing order number such as `BND23782`.
///
/// Numbers are illustrative: they are drawn at random when an order is placed
/// and are not guaranteed to be unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Prefix shared by every order number.
    pub const PREFIX: &'static str = "BND";
    /// Number of digits after the prefix.
    pub const DIGITS: usize = 5;

    /// Draw a new order number from the thread-local RNG.
    #[must_use]
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::rng())
    }

    /// Draw a new order number from the given RNG.
    pub fn generate_with<R: Rng>(rng: &mut R) -> Self {
        let n: u32 = rng.random_range(10_000..100_000);
        Self(format!("{}{n}", Self::PREFIX))
    }

    /// Parse an order number.
    ///
    /// # Errors
    ///
    /// Returns an error if the prefix or digit count is wrong.
    pub fn parse(s: &str) -> Result<Self, OrderNumberError> {
        let digits = s
            .strip_prefix(Self::PREFIX)
            .ok_or(OrderNumberError::MissingPrefix {
                prefix: Self::PREFIX,
            })?;
        if digits.len() != Self::DIGITS || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(OrderNumberError::InvalidDigits {
                digits: Self::DIGITS,
            });
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the order number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl TryFrom<String> for OrderNumber {
    type Error = OrderNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<OrderNumber> for String {
    fn from(number: OrderNumber) -> Self {
        number.0
    }
}
