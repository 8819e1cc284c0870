//! Product catalog.
//!
//! The catalog is a read-only collection of [`Product`] records supplied by a
//! [`ProductCatalog`] implementation. Nothing in the storefront mutates it;
//! listings are recomputed from the full collection on every request (see
//! [`filter`]).
//!
//! [`StaticCatalog`] is the only provider today. It serves either the built-in
//! fixture collection or a JSON file loaded at startup.

pub mod filter;

use std::collections::HashSet;
use std::path::Path;

use bound_core::{CurrencyCode, Price, ProductId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use filter::{
    Facet, FilterOptions, FilterSelection, PricePreset, PriceRange, SortOption, filter_and_sort,
};

/// Errors that can occur while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalog file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate product id {0}")]
    DuplicateId(ProductId),
    #[error("duplicate product slug '{0}'")]
    DuplicateSlug(String),
    #[error("product '{0}' has a negative price")]
    NegativePrice(String),
}

/// A product in the catalog.
///
/// One schema covers every product page: sizes, color, brand, images, and
/// the optional fabric/care details shown on the detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    /// URL handle, unique within the catalog.
    pub slug: String,
    pub name: String,
    /// Unit price (non-negative).
    pub price: Price,
    pub category: String,
    pub brand: String,
    pub color: String,
    /// Image URLs; the first one is the primary image.
    #[serde(default)]
    pub images: Vec<String>,
    /// Size options in display order. Empty means one-size.
    #[serde(default)]
    pub sizes: Vec<String>,
    /// Units on hand, `None` when stock is not tracked.
    #[serde(default)]
    pub stock: Option<u32>,
    #[serde(default)]
    pub fabric: Option<String>,
    #[serde(default)]
    pub care: Vec<String>,
}

impl Product {
    /// Primary image, if any.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Returns `true` if the product must be added with a size.
    #[must_use]
    pub fn requires_size(&self) -> bool {
        !self.sizes.is_empty()
    }

    /// Returns `true` if `size` is one of the product's size options.
    #[must_use]
    pub fn offers_size(&self, size: &str) -> bool {
        self.sizes.iter().any(|s| s == size)
    }

    /// Returns `true` if stock is tracked and nothing is left.
    #[must_use]
    pub const fn is_sold_out(&self) -> bool {
        matches!(self.stock, Some(0))
    }
}

/// Read-only source of products.
///
/// Implementations must return the same products in the same order for the
/// lifetime of the value; "featured" ordering is the order returned here.
pub trait ProductCatalog: Send + Sync {
    /// All products in featured order.
    fn list_products(&self) -> &[Product];

    /// Find a product by its slug.
    fn find_by_slug(&self, slug: &str) -> Option<&Product> {
        self.list_products().iter().find(|p| p.slug == slug)
    }

    /// Find a product by its id.
    fn find_by_id(&self, id: ProductId) -> Option<&Product> {
        self.list_products().iter().find(|p| p.id == id)
    }
}

/// In-memory catalog backed by a `Vec`.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    products: Vec<Product>,
}

impl StaticCatalog {
    /// Build a catalog from a list of products.
    ///
    /// # Errors
    ///
    /// Returns an error if two products share an id or slug, or if a price
    /// is negative.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut ids = HashSet::new();
        let mut slugs = HashSet::new();
        for product in &products {
            if !ids.insert(product.id) {
                return Err(CatalogError::DuplicateId(product.id));
            }
            if !slugs.insert(product.slug.as_str()) {
                return Err(CatalogError::DuplicateSlug(product.slug.clone()));
            }
            if product.price.amount.is_sign_negative() && !product.price.amount.is_zero() {
                return Err(CatalogError::NegativePrice(product.slug.clone()));
            }
        }
        Ok(Self { products })
    }

    /// Load a catalog from a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or fails the
    /// checks in [`StaticCatalog::new`].
    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        let products: Vec<Product> = serde_json::from_str(&content)?;
        let catalog = Self::new(products)?;
        tracing::info!(
            path = %path.display(),
            products = catalog.products.len(),
            "Loaded catalog from file"
        );
        Ok(catalog)
    }

    /// The built-in Bound collection.
    #[must_use]
    pub fn bound_collection() -> Self {
        Self {
            products: fixture::products(),
        }
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Returns `true` if the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl ProductCatalog for StaticCatalog {
    fn list_products(&self) -> &[Product] {
        &self.products
    }
}

/// Built-in product data.
mod fixture {
    use super::{CurrencyCode, Price, Product, ProductId};

    const APPAREL_SIZES: [&str; 4] = ["S", "M", "L", "XL"];
    const WAIST_SIZES: [&str; 4] = ["30", "32", "34", "36"];
    const SHOE_SIZES: [&str; 5] = ["7", "8", "9", "10", "11"];
    const IMAGE_QUERY: &str = "?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=1";

    struct Row {
        id: i32,
        name: &'static str,
        cents: i64,
        photo: u32,
        category: &'static str,
        brand: &'static str,
        color: &'static str,
        sizes: &'static [&'static str],
        stock: Option<u32>,
        fabric: Option<&'static str>,
        care: &'static [&'static str],
    }

    const GARMENT_CARE: &[&str] = &[
        "Dry clean preferred",
        "Do not tumble dry",
        "Iron at medium temperature",
    ];

    const ROWS: &[Row] = &[
        Row {
            id: 1,
            name: "Classic Oxford Shirt",
            cents: 8999,
            photo: 297_933,
            category: "tops",
            brand: "Bound Essentials",
            color: "blue",
            sizes: &APPAREL_SIZES,
            stock: Some(24),
            fabric: Some("100% cotton oxford weave"),
            care: GARMENT_CARE,
        },
        Row {
            id: 2,
            name: "Slim Fit Chinos",
            cents: 6999,
            photo: 3_760_610,
            category: "bottoms",
            brand: "Urban Style",
            color: "beige",
            sizes: &WAIST_SIZES,
            stock: Some(18),
            fabric: Some("98% cotton, 2% elastane stretch twill"),
            care: GARMENT_CARE,
        },
        Row {
            id: 3,
            name: "Premium Leather Watch",
            cents: 12_999,
            photo: 9_979_804,
            category: "accessories",
            brand: "Lux Time",
            color: "brown",
            sizes: &[],
            stock: Some(6),
            fabric: Some("Full-grain leather strap, stainless steel case"),
            care: &["Keep away from water", "Wipe with a soft dry cloth"],
        },
        Row {
            id: 4,
            name: "Casual Denim Jacket",
            cents: 11_999,
            photo: 1_192_609,
            category: "outerwear",
            brand: "Bound Essentials",
            color: "blue",
            sizes: &APPAREL_SIZES,
            stock: Some(12),
            fabric: Some("12 oz rigid denim"),
            care: GARMENT_CARE,
        },
        Row {
            id: 5,
            name: "Designer Sunglasses",
            cents: 9999,
            photo: 701_877,
            category: "accessories",
            brand: "Vista",
            color: "black",
            sizes: &[],
            stock: Some(9),
            fabric: None,
            care: &["Store in the supplied case"],
        },
        Row {
            id: 6,
            name: "Premium Sneakers",
            cents: 13_999,
            photo: 1_598_505,
            category: "footwear",
            brand: "Step Elite",
            color: "white",
            sizes: &SHOE_SIZES,
            stock: Some(15),
            fabric: Some("Leather upper, rubber sole"),
            care: &["Spot clean only"],
        },
        Row {
            id: 7,
            name: "Merino Wool Sweater",
            cents: 10_999,
            photo: 45_982,
            category: "tops",
            brand: "Bound Essentials",
            color: "gray",
            sizes: &APPAREL_SIZES,
            stock: Some(10),
            fabric: Some("100% extra-fine merino wool"),
            care: &["Hand wash cold", "Dry flat"],
        },
        Row {
            id: 8,
            name: "Leather Belt",
            cents: 5999,
            photo: 45_055,
            category: "accessories",
            brand: "Urban Style",
            color: "brown",
            sizes: &WAIST_SIZES,
            stock: None,
            fabric: Some("Vegetable-tanned leather"),
            care: &["Condition occasionally"],
        },
    ];

    pub(super) fn products() -> Vec<Product> {
        ROWS.iter()
            .map(|row| Product {
                id: ProductId::new(row.id),
                slug: slugify(row.name),
                name: row.name.to_string(),
                price: Price::from_cents(row.cents, CurrencyCode::USD),
                category: row.category.to_string(),
                brand: row.brand.to_string(),
                color: row.color.to_string(),
                images: vec![format!(
                    "https://images.pexels.com/photos/{0}/pexels-photo-{0}.jpeg{IMAGE_QUERY}",
                    row.photo
                )],
                sizes: row.sizes.iter().map(ToString::to_string).collect(),
                stock: row.stock,
                fabric: row.fabric.map(ToString::to_string),
                care: row.care.iter().map(ToString::to_string).collect(),
            })
            .collect()
    }

    fn slugify(name: &str) -> String {
        name.to_lowercase().replace(' ', "-")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_collection_is_valid() {
        let catalog = StaticCatalog::bound_collection();
        assert_eq!(catalog.len(), 8);
        // Re-run the constructor checks over the fixture data.
        assert!(StaticCatalog::new(catalog.list_products().to_vec()).is_ok());
    }

    #[test]
    fn test_find_by_slug_and_id() {
        let catalog = StaticCatalog::bound_collection();
        let jacket = catalog.find_by_slug("casual-denim-jacket").unwrap();
        assert_eq!(jacket.id, ProductId::new(4));
        assert_eq!(jacket.price.display(), "$119.99");
        assert_eq!(catalog.find_by_id(ProductId::new(4)), Some(jacket));
        assert!(catalog.find_by_slug("missing").is_none());
    }

    #[test]
    fn test_fixture_images_are_pexels_urls() {
        let catalog = StaticCatalog::bound_collection();
        let shirt = catalog.find_by_id(ProductId::new(1)).unwrap();
        assert_eq!(
            shirt.primary_image().unwrap(),
            "https://images.pexels.com/photos/297933/pexels-photo-297933.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=1"
        );
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let mut products = StaticCatalog::bound_collection().list_products().to_vec();
        let mut copy = products[0].clone();
        copy.slug = "another-slug".to_string();
        products.push(copy);
        assert!(matches!(
            StaticCatalog::new(products),
            Err(CatalogError::DuplicateId(_))
        ));
    }

    #[test]
    fn test_rejects_duplicate_slugs() {
        let mut products = StaticCatalog::bound_collection().list_products().to_vec();
        let mut copy = products[0].clone();
        copy.id = ProductId::new(99);
        products.push(copy);
        assert!(matches!(
            StaticCatalog::new(products),
            Err(CatalogError::DuplicateSlug(_))
        ));
    }

    #[test]
    fn test_rejects_negative_price() {
        let mut products = StaticCatalog::bound_collection().list_products().to_vec();
        products[0].price = Price::from_cents(-1, CurrencyCode::USD);
        assert!(matches!(
            StaticCatalog::new(products),
            Err(CatalogError::NegativePrice(_))
        ));
    }

    #[test]
    fn test_size_helpers() {
        let catalog = StaticCatalog::bound_collection();
        let watch = catalog.find_by_slug("premium-leather-watch").unwrap();
        assert!(!watch.requires_size());
        let shirt = catalog.find_by_slug("classic-oxford-shirt").unwrap();
        assert!(shirt.requires_size());
        assert!(shirt.offers_size("M"));
        assert!(!shirt.offers_size("m"));
    }

    #[test]
    fn test_json_roundtrip_through_file() {
        let dir = std::env::temp_dir().join(format!("bound-catalog-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("catalog.json");
        let products = StaticCatalog::bound_collection().list_products().to_vec();
        std::fs::write(&path, serde_json::to_string(&products).unwrap()).unwrap();

        let loaded = StaticCatalog::from_json_file(&path).unwrap();
        assert_eq!(loaded.list_products(), products.as_slice());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_json_missing_optional_fields() {
        let json = r#"[{
            "id": 1,
            "slug": "plain-tee",
            "name": "Plain Tee",
            "price": {"amount": "19.00", "currency_code": "USD"},
            "category": "tops",
            "brand": "Bound Essentials",
            "color": "white"
        }]"#;
        let products: Vec<Product> = serde_json::from_str(json).unwrap();
        assert!(products[0].sizes.is_empty());
        assert_eq!(products[0].stock, None);
    }
}
