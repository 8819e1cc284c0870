//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::catalog::{
    Facet, FilterOptions, FilterSelection, PricePreset, Product, ProductCatalog, SortOption,
    filter_and_sort,
};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Listing query parameters. Every parameter is optional.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub category: Option<String>,
    pub brand: Option<String>,
    pub color: Option<String>,
    /// Price preset slug, e.g. `50-100`.
    pub price: Option<String>,
    pub sort: Option<String>,
}

impl ListingQuery {
    /// Parse into a filter selection and sort key.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` for an unknown price preset or sort key.
    pub fn parse(&self) -> Result<(FilterSelection, SortOption)> {
        let price = self
            .price
            .as_deref()
            .map(str::parse::<PricePreset>)
            .transpose()
            .map_err(AppError::BadRequest)?
            .unwrap_or_default();
        let sort = self
            .sort
            .as_deref()
            .map(str::parse::<SortOption>)
            .transpose()
            .map_err(AppError::BadRequest)?
            .unwrap_or_default();

        let filter = FilterSelection {
            category: Facet::parse(self.category.as_deref()),
            brand: Facet::parse(self.brand.as_deref()),
            color: Facet::parse(self.color.as_deref()),
            price: price.range(),
        };
        Ok((filter, sort))
    }
}

/// A product with its display price.
#[derive(Debug, Serialize)]
pub struct ProductView<'a> {
    #[serde(flatten)]
    pub product: &'a Product,
    pub display_price: String,
    pub sold_out: bool,
}

impl<'a> From<&'a Product> for ProductView<'a> {
    fn from(product: &'a Product) -> Self {
        Self {
            product,
            display_price: product.price.display(),
            sold_out: product.is_sold_out(),
        }
    }
}

/// Product listing response.
#[derive(Debug, Serialize)]
pub struct ListingResponse<'a> {
    pub products: Vec<ProductView<'a>>,
    pub count: usize,
    /// `true` when nothing matches, so clients can show an empty state.
    pub is_empty: bool,
    pub filter: FilterSelection,
    pub sort: SortOption,
}

/// Filtered and sorted product listing.
///
/// GET /products
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> Result<Json<serde_json::Value>> {
    let (filter, sort) = query.parse()?;
    let visible = filter_and_sort(state.catalog().list_products(), &filter, sort);

    let response = ListingResponse {
        count: visible.len(),
        is_empty: visible.is_empty(),
        products: visible.into_iter().map(ProductView::from).collect(),
        filter,
        sort,
    };
    Ok(Json(to_value(&response)?))
}

/// Options for the filter controls.
///
/// GET /products/filters
#[instrument(skip(state))]
pub async fn filters(State(state): State<AppState>) -> Json<FilterOptions> {
    Json(FilterOptions::from_products(state.catalog().list_products()))
}

/// Product detail.
///
/// GET /products/{slug}
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let product = state
        .catalog()
        .find_by_slug(&slug)
        .ok_or_else(|| AppError::NotFound(format!("product '{slug}'")))?;
    Ok(Json(to_value(&ProductView::from(product))?))
}

/// Views borrow from the state, so they are rendered before it drops.
fn to_value<T: Serialize>(value: &T) -> Result<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| AppError::Internal(e.to_string()))
}
