//! Product listing: filtering and sorting.
//!
//! Every listing is recomputed from the full collection. Filters are
//! conjunctive; a dimension set to [`Facet::All`] is skipped. Sorting runs
//! after filtering.

use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Product;

/// A single filter dimension: either everything, or one value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Facet {
    #[default]
    All,
    Only(String),
}

impl Facet {
    /// Label used for the pass-through option.
    pub const ALL: &'static str = "All";

    /// Build a facet from an optional query value.
    ///
    /// Missing, blank and `"All"` (any case) values all mean [`Facet::All`].
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => Self::All,
            Some(v) if v.eq_ignore_ascii_case(Self::ALL) => Self::All,
            Some(v) => Self::Only(v.to_string()),
        }
    }

    fn matches_ignore_case(&self, value: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted.to_lowercase() == value.to_lowercase(),
        }
    }

    fn matches_exact(&self, value: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == value,
        }
    }
}

impl From<String> for Facet {
    fn from(value: String) -> Self {
        Self::parse(Some(&value))
    }
}

impl From<Facet> for String {
    fn from(facet: Facet) -> Self {
        match facet {
            Facet::All => Facet::ALL.to_string(),
            Facet::Only(value) => value,
        }
    }
}

/// An inclusive price range; `max: None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Decimal,
    pub max: Option<Decimal>,
}

impl PriceRange {
    /// Every non-negative price.
    pub const ANY: Self = Self {
        min: Decimal::ZERO,
        max: None,
    };

    /// Returns `true` if `min <= amount <= max`.
    #[must_use]
    pub fn contains(&self, amount: Decimal) -> bool {
        amount >= self.min && self.max.is_none_or(|max| amount <= max)
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self::ANY
    }
}

/// The price bands offered in the shop sidebar.
///
/// Adjacent bands share their boundary (a $100.00 item is in both
/// "$50 - $100" and "$100 - $150").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PricePreset {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "under-50")]
    Under50,
    #[serde(rename = "50-100")]
    From50To100,
    #[serde(rename = "100-150")]
    From100To150,
    #[serde(rename = "over-150")]
    Over150,
}

impl PricePreset {
    /// All presets in display order.
    pub const ALL: [Self; 5] = [
        Self::All,
        Self::Under50,
        Self::From50To100,
        Self::From100To150,
        Self::Over150,
    ];

    /// The range this preset selects.
    #[must_use]
    pub fn range(self) -> PriceRange {
        let (min, max): (u32, Option<u32>) = match self {
            Self::All => (0, None),
            Self::Under50 => (0, Some(50)),
            Self::From50To100 => (50, Some(100)),
            Self::From100To150 => (100, Some(150)),
            Self::Over150 => (150, None),
        };
        PriceRange {
            min: Decimal::from(min),
            max: max.map(Decimal::from),
        }
    }

    /// Label shown next to the radio button.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Under50 => "Under $50",
            Self::From50To100 => "$50 - $100",
            Self::From100To150 => "$100 - $150",
            Self::Over150 => "Over $150",
        }
    }

    /// Query-string value.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Under50 => "under-50",
            Self::From50To100 => "50-100",
            Self::From100To150 => "100-150",
            Self::Over150 => "over-150",
        }
    }
}

impl std::str::FromStr for PricePreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.slug() == s || preset.label() == s)
            .ok_or_else(|| format!("invalid price range: {s}"))
    }
}

/// The complete set of active filters. Replaced wholesale on every change.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterSelection {
    /// Compared case-insensitively.
    #[serde(default)]
    pub category: Facet,
    /// Compared exactly.
    #[serde(default)]
    pub brand: Facet,
    /// Compared case-insensitively.
    #[serde(default)]
    pub color: Facet,
    #[serde(default)]
    pub price: PriceRange,
}

impl FilterSelection {
    /// Returns `true` if the product passes every active filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        self.category.matches_ignore_case(&product.category)
            && self.brand.matches_exact(&product.brand)
            && self.color.matches_ignore_case(&product.color)
            && self.price.contains(product.price.amount)
    }
}

/// Listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOption {
    /// Catalog order, untouched.
    #[default]
    #[serde(rename = "featured")]
    Featured,
    #[serde(rename = "price-low-high")]
    PriceLowHigh,
    #[serde(rename = "price-high-low")]
    PriceHighLow,
    /// Alphabetical ignoring case; see [`collate`].
    #[serde(rename = "name-a-z")]
    NameAZ,
    #[serde(rename = "name-z-a")]
    NameZA,
}

impl SortOption {
    /// All sort options in display order.
    pub const ALL: [Self; 5] = [
        Self::Featured,
        Self::PriceLowHigh,
        Self::PriceHighLow,
        Self::NameAZ,
        Self::NameZA,
    ];

    /// Query-string value.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::PriceLowHigh => "price-low-high",
            Self::PriceHighLow => "price-high-low",
            Self::NameAZ => "name-a-z",
            Self::NameZA => "name-z-a",
        }
    }

    /// Label shown in the sort dropdown.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Featured => "Featured",
            Self::PriceLowHigh => "Price: Low to High",
            Self::PriceHighLow => "Price: High to Low",
            Self::NameAZ => "Name: A to Z",
            Self::NameZA => "Name: Z to A",
        }
    }

    fn sort(self, products: &mut [&Product]) {
        match self {
            Self::Featured => {}
            Self::PriceLowHigh => products.sort_by(|a, b| a.price.amount.cmp(&b.price.amount)),
            Self::PriceHighLow => products.sort_by(|a, b| b.price.amount.cmp(&a.price.amount)),
            Self::NameAZ => products.sort_by(|a, b| collate(&a.name, &b.name)),
            Self::NameZA => products.sort_by(|a, b| collate(&b.name, &a.name)),
        }
    }
}

/// Dictionary order for names.
///
/// Compares case-folded text first, so "apple" precedes "Banana". Names
/// equal up to case put lowercase first, and the raw text breaks any
/// remaining tie so the order is total.
#[must_use]
pub fn collate(a: &str, b: &str) -> Ordering {
    let folded = |s: &str| s.chars().flat_map(char::to_lowercase).collect::<Vec<_>>();
    folded(a)
        .cmp(&folded(b))
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}

impl std::str::FromStr for SortOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|option| option.slug() == s)
            .ok_or_else(|| format!("invalid sort option: {s}"))
    }
}

/// Filter and sort `products`.
///
/// An empty result is valid and means "no matches".
#[must_use]
pub fn filter_and_sort<'a>(
    products: &'a [Product],
    filter: &FilterSelection,
    sort: SortOption,
) -> Vec<&'a Product> {
    let mut visible: Vec<&Product> = products.iter().filter(|p| filter.matches(p)).collect();
    sort.sort(&mut visible);
    tracing::debug!(
        total = products.len(),
        visible = visible.len(),
        sort = sort.slug(),
        "Recomputed product listing"
    );
    visible
}

/// Values offered by the filter controls, derived from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub categories: Vec<String>,
    pub brands: Vec<String>,
    pub colors: Vec<String>,
    pub price_ranges: Vec<PricePreset>,
    pub sort_options: Vec<SortOption>,
}

impl FilterOptions {
    /// Collect distinct values in first-seen order, each list led by `All`.
    ///
    /// Categories and colors are title-cased and de-duplicated ignoring
    /// case, matching how they are compared.
    #[must_use]
    pub fn from_products(products: &[Product]) -> Self {
        let mut categories = vec![Facet::ALL.to_string()];
        let mut brands = vec![Facet::ALL.to_string()];
        let mut colors = vec![Facet::ALL.to_string()];

        for product in products {
            push_unique(&mut categories, title_case(&product.category), true);
            push_unique(&mut brands, product.brand.clone(), false);
            push_unique(&mut colors, title_case(&product.color), true);
        }

        Self {
            categories,
            brands,
            colors,
            price_ranges: PricePreset::ALL.to_vec(),
            sort_options: SortOption::ALL.to_vec(),
        }
    }
}

fn push_unique(values: &mut Vec<String>, value: String, ignore_case: bool) {
    let exists = values.iter().any(|v| {
        if ignore_case {
            v.to_lowercase() == value.to_lowercase()
        } else {
            *v == value
        }
    });
    if !exists {
        values.push(value);
    }
}

fn title_case(value: &str) -> String {
    let mut chars = value.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bound_core::{CurrencyCode, Price, ProductId};

    use super::*;
    use crate::catalog::{ProductCatalog, StaticCatalog};

    fn product(id: i32, name: &str, cents: i64, category: &str, color: &str) -> Product {
        Product {
            id: ProductId::new(id),
            slug: format!("p-{id}"),
            name: name.to_string(),
            price: Price::from_cents(cents, CurrencyCode::USD),
            category: category.to_string(),
            brand: "Bound Essentials".to_string(),
            color: color.to_string(),
            images: Vec::new(),
            sizes: Vec::new(),
            stock: None,
            fabric: None,
            care: Vec::new(),
        }
    }

    fn names(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.name.clone()).collect()
    }

    fn prices(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.price.amount.to_string()).collect()
    }

    #[test]
    fn test_no_filters_returns_everything_in_order() {
        let catalog = StaticCatalog::bound_collection();
        let visible = filter_and_sort(
            catalog.list_products(),
            &FilterSelection::default(),
            SortOption::Featured,
        );
        let ids: Vec<i32> = visible.iter().map(|p| p.id.as_i32()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_category_filter_is_case_insensitive() {
        let products = vec![
            product(1, "Oxford", 8999, "tops", "blue"),
            product(2, "Parka", 19_999, "outerwear", "green"),
            product(3, "Denim Jacket", 11_999, "outerwear", "blue"),
            product(4, "Chinos", 6999, "bottoms", "beige"),
        ];
        let filter = FilterSelection {
            category: Facet::parse(Some("Outerwear")),
            ..FilterSelection::default()
        };
        let visible = filter_and_sort(&products, &filter, SortOption::Featured);
        assert_eq!(names(&visible), vec!["Parka", "Denim Jacket"]);

        let narrowed = FilterSelection {
            color: Facet::parse(Some("Blue")),
            ..filter
        };
        let visible = filter_and_sort(&products, &narrowed, SortOption::Featured);
        assert_eq!(names(&visible), vec!["Denim Jacket"]);
    }

    #[test]
    fn test_brand_filter_is_exact() {
        let catalog = StaticCatalog::bound_collection();
        let exact = FilterSelection {
            brand: Facet::parse(Some("Urban Style")),
            ..FilterSelection::default()
        };
        let visible = filter_and_sort(catalog.list_products(), &exact, SortOption::Featured);
        assert_eq!(names(&visible), vec!["Slim Fit Chinos", "Leather Belt"]);

        let wrong_case = FilterSelection {
            brand: Facet::parse(Some("urban style")),
            ..FilterSelection::default()
        };
        assert!(filter_and_sort(catalog.list_products(), &wrong_case, SortOption::Featured).is_empty());
    }

    #[test]
    fn test_price_range_bounds_are_inclusive() {
        let products = vec![
            product(1, "Fifty", 5000, "tops", "blue"),
            product(2, "Hundred", 10_000, "tops", "blue"),
            product(3, "Hundred And One", 10_001, "tops", "blue"),
        ];
        let filter = FilterSelection {
            price: PricePreset::From50To100.range(),
            ..FilterSelection::default()
        };
        let visible = filter_and_sort(&products, &filter, SortOption::Featured);
        assert_eq!(names(&visible), vec!["Fifty", "Hundred"]);
    }

    #[test]
    fn test_over_preset_is_unbounded() {
        let products = vec![
            product(1, "Cheap", 14_999, "tops", "blue"),
            product(2, "Pricey", 99_999_999, "tops", "blue"),
        ];
        let filter = FilterSelection {
            price: PricePreset::Over150.range(),
            ..FilterSelection::default()
        };
        let visible = filter_and_sort(&products, &filter, SortOption::Featured);
        assert_eq!(names(&visible), vec!["Pricey"]);
    }

    #[test]
    fn test_no_matches_is_empty() {
        let catalog = StaticCatalog::bound_collection();
        let filter = FilterSelection {
            category: Facet::parse(Some("Footwear")),
            color: Facet::parse(Some("Brown")),
            ..FilterSelection::default()
        };
        assert!(filter_and_sort(catalog.list_products(), &filter, SortOption::PriceLowHigh).is_empty());
    }

    #[test]
    fn test_sort_by_price() {
        let products = vec![
            product(1, "A", 8999, "tops", "blue"),
            product(2, "B", 6999, "tops", "blue"),
            product(3, "C", 12_999, "tops", "blue"),
        ];
        let filter = FilterSelection::default();

        let ascending = filter_and_sort(&products, &filter, SortOption::PriceLowHigh);
        assert_eq!(prices(&ascending), vec!["69.99", "89.99", "129.99"]);

        let descending = filter_and_sort(&products, &filter, SortOption::PriceHighLow);
        assert_eq!(prices(&descending), vec!["129.99", "89.99", "69.99"]);
    }

    #[test]
    fn test_sort_by_name() {
        let catalog = StaticCatalog::bound_collection();
        let filter = FilterSelection::default();

        let a_z = names(&filter_and_sort(catalog.list_products(), &filter, SortOption::NameAZ));
        let mut expected = a_z.clone();
        expected.sort();
        assert_eq!(a_z, expected);
        assert_eq!(a_z.first().unwrap(), "Casual Denim Jacket");

        let mut z_a = names(&filter_and_sort(catalog.list_products(), &filter, SortOption::NameZA));
        z_a.reverse();
        assert_eq!(z_a, a_z);
    }

    #[test]
    fn test_name_sort_ignores_case() {
        let products = vec![
            product(1, "Banana", 100, "tops", "blue"),
            product(2, "apple", 100, "tops", "blue"),
            product(3, "Apple", 100, "tops", "blue"),
            product(4, "cherry", 100, "tops", "blue"),
        ];
        let visible = filter_and_sort(&products, &FilterSelection::default(), SortOption::NameAZ);
        assert_eq!(names(&visible), vec!["apple", "Apple", "Banana", "cherry"]);

        let visible = filter_and_sort(&products, &FilterSelection::default(), SortOption::NameZA);
        assert_eq!(names(&visible), vec!["cherry", "Banana", "Apple", "apple"]);
    }

    #[test]
    fn test_collate() {
        assert_eq!(collate("apple", "Banana"), Ordering::Less);
        assert_eq!(collate("apple", "Apple"), Ordering::Less);
        assert_eq!(collate("Zip", "zip"), Ordering::Greater);
        assert_eq!(collate("Same", "Same"), Ordering::Equal);
        assert_eq!(collate("Bag", "Bags"), Ordering::Less);
    }

    #[test]
    fn test_facet_parse() {
        assert_eq!(Facet::parse(None), Facet::All);
        assert_eq!(Facet::parse(Some("  ")), Facet::All);
        assert_eq!(Facet::parse(Some("all")), Facet::All);
        assert_eq!(Facet::parse(Some(" Blue ")), Facet::Only("Blue".to_string()));
    }

    #[test]
    fn test_preset_and_sort_from_str() {
        assert_eq!("100-150".parse::<PricePreset>().unwrap(), PricePreset::From100To150);
        assert_eq!("Under $50".parse::<PricePreset>().unwrap(), PricePreset::Under50);
        assert!("cheap".parse::<PricePreset>().is_err());

        assert_eq!("name-z-a".parse::<SortOption>().unwrap(), SortOption::NameZA);
        assert!("popular".parse::<SortOption>().is_err());
    }

    #[test]
    fn test_filter_options_from_catalog() {
        let catalog = StaticCatalog::bound_collection();
        let options = FilterOptions::from_products(catalog.list_products());
        assert_eq!(
            options.categories,
            vec!["All", "Tops", "Bottoms", "Accessories", "Outerwear", "Footwear"]
        );
        assert_eq!(
            options.brands,
            vec!["All", "Bound Essentials", "Urban Style", "Lux Time", "Vista", "Step Elite"]
        );
        assert_eq!(
            options.colors,
            vec!["All", "Blue", "Beige", "Brown", "Black", "White", "Gray"]
        );
        assert_eq!(options.price_ranges.len(), 5);
        assert_eq!(options.sort_options.first(), Some(&SortOption::Featured));
    }

    #[test]
    fn test_filter_selection_serde_defaults() {
        let filter: FilterSelection = serde_json::from_str(r#"{"category":"Tops"}"#).unwrap();
        assert_eq!(filter.category, Facet::Only("Tops".to_string()));
        assert_eq!(filter.brand, Facet::All);
        assert_eq!(filter.price, PriceRange::ANY);
    }
}
