//! Bound Core - Shared types library.
//!
//! This crate provides common types used across all Bound components:
//! - `storefront` - Catalog, cart and checkout engine plus the JSON API
//! - `cli` - Command-line tools for browsing the catalog and pricing carts
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP, no session state.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, order
//!   numbers and checkout enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
