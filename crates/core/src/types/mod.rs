//! Core types for Bound.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod order;
pub mod price;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use order::{OrderNumber, OrderNumberError};
pub use price::{CurrencyCode, Price};
pub use status::*;
