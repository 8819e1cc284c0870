//! `bound catalog` - list products.

use std::fmt::Write as _;

use bound_storefront::catalog::{
    Facet, FilterSelection, PricePreset, ProductCatalog, SortOption, filter_and_sort,
};
use tracing::info;

use super::{CommandError, Context, emit};

/// Listing options as given on the command line.
#[derive(Debug, Default)]
pub struct Listing {
    pub category: Option<String>,
    pub brand: Option<String>,
    pub color: Option<String>,
    pub price: String,
    pub sort: String,
}

/// List products.
///
/// # Errors
///
/// Returns an error for an unknown price range or sort option.
pub fn run(context: &Context, listing: &Listing, json: bool) -> Result<(), CommandError> {
    emit(&render(context, listing, json)?);
    Ok(())
}

fn render(context: &Context, listing: &Listing, json: bool) -> Result<String, CommandError> {
    let price: PricePreset = listing.price.parse().map_err(CommandError::InvalidOption)?;
    let sort: SortOption = listing.sort.parse().map_err(CommandError::InvalidOption)?;
    let filter = FilterSelection {
        category: Facet::parse(listing.category.as_deref()),
        brand: Facet::parse(listing.brand.as_deref()),
        color: Facet::parse(listing.color.as_deref()),
        price: price.range(),
    };

    let products = filter_and_sort(context.catalog.list_products(), &filter, sort);
    info!(count = products.len(), sort = sort.slug(), "Listed products");

    if json {
        return Ok(serde_json::to_string_pretty(&products)?);
    }

    if products.is_empty() {
        return Ok("No products match these filters.".to_string());
    }

    let mut out = String::new();
    for product in &products {
        let _ = writeln!(
            out,
            "{:<24} {:>9}  {:<12} {:<18} {}",
            product.name,
            product.price.display(),
            product.category,
            product.brand,
            product.color
        );
    }
    let _ = write!(out, "{} product(s)", products.len());
    Ok(out)
}
