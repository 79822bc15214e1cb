//! # Catalog
//!
//! The static list of purchasable items the storefront offers.
//!
//! The catalog belongs to the presentation side; the core only validates it
//! and looks items up by id. Catalog data is never mutated by the cart.
//!
//! ## Catalog File Format
//! ```json
//! [
//!   { "id": 1, "name": "Gaming Laptop", "category": "Electronics", "unitPrice": "1200" },
//!   { "id": 6, "name": "Clean Code", "category": "Books", "unitPrice": "40" }
//! ]
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{CatalogId, CatalogItem, Category};
use crate::validation::{validate_price, validate_product_name};

/// Ordered, validated list of catalog items with unique ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    /// Builds a catalog, rejecting duplicate ids, blank names and out-of-range prices.
    pub fn new(items: Vec<CatalogItem>) -> CoreResult<Self> {
        for (i, item) in items.iter().enumerate() {
            validate_product_name(&item.name)?;
            validate_price(item.unit_price)?;
            if items[..i].iter().any(|other| other.id == item.id) {
                return Err(ValidationError::Duplicate {
                    field: "catalog id".to_string(),
                    value: item.id.to_string(),
                }
                .into());
            }
        }
        Ok(Catalog { items })
    }

    /// Parses a catalog from a JSON array of items.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let items: Vec<CatalogItem> =
            serde_json::from_str(json).map_err(|e| CoreError::Catalog(e.to_string()))?;
        Self::new(items)
    }

    /// The demo storefront's twelve products.
    pub fn sample() -> Self {
        let product = |id, name: &str, category, price| {
            CatalogItem::new(id, name, category, Money::from_major(price))
        };

        Catalog {
            items: vec![
                product(1, "Gaming Laptop", Category::Electronics, 1200),
                product(2, "Wireless Headphones", Category::Electronics, 150),
                product(3, "Smartphone", Category::Electronics, 800),
                product(4, "Smart Watch", Category::Electronics, 300),
                product(5, "JavaScript: The Good Parts", Category::Books, 45),
                product(6, "Clean Code", Category::Books, 40),
                product(7, "Design Patterns", Category::Books, 55),
                product(8, "The Pragmatic Programmer", Category::Books, 50),
                product(9, "Premium T-Shirt", Category::Clothing, 35),
                product(10, "Designer Jeans", Category::Clothing, 120),
                product(11, "Winter Jacket", Category::Clothing, 200),
                product(12, "Running Shoes", Category::Clothing, 150),
            ],
        }
    }

    pub fn get(&self, id: CatalogId) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Looks an item up, failing with `ProductNotFound` for unknown ids.
    pub fn require(&self, id: CatalogId) -> CoreResult<&CatalogItem> {
        self.get(id).ok_or(CoreError::ProductNotFound(id))
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &CatalogItem> {
        self.items.iter().filter(move |item| item.category == category)
    }

    /// Categories that have at least one item, in declaration order.
    pub fn categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| self.items.iter().any(|item| item.category == *c))
            .collect()
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::sample()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_catalog_is_valid() {
        let sample = Catalog::sample();
        assert_eq!(sample.len(), 12);
        assert!(Catalog::new(sample.items().to_vec()).is_ok());
    }

    #[test]
    fn test_lookup() {
        let catalog = Catalog::sample();
        let laptop = catalog.get(1).unwrap();
        assert_eq!(laptop.name, "Gaming Laptop");
        assert_eq!(laptop.unit_price, Money::from_major(1200));
        assert!(catalog.get(99).is_none());
        assert!(matches!(catalog.require(99), Err(CoreError::ProductNotFound(99))));
    }

    #[test]
    fn test_by_category() {
        let catalog = Catalog::sample();
        let books: Vec<_> = catalog.by_category(Category::Books).map(|i| i.id).collect();
        assert_eq!(books, vec![5, 6, 7, 8]);
        assert_eq!(catalog.categories(), Category::ALL.to_vec());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let items = vec![
            CatalogItem::new(1, "A", Category::Books, Money::from_major(1)),
            CatalogItem::new(1, "B", Category::Books, Money::from_major(2)),
        ];
        assert!(matches!(
            Catalog::new(items),
            Err(CoreError::Validation(ValidationError::Duplicate { .. }))
        ));
    }

    #[test]
    fn test_negative_price_rejected() {
        let items = vec![CatalogItem::new(1, "Refund", Category::Books, Money::from_major(-1))];
        assert!(Catalog::new(items).is_err());
    }

    #[test]
    fn test_from_json_rejects_huge_price() {
        let json = r#"[{ "id": 1, "name": "Yacht", "category": "Electronics", "unitPrice": "100000000000000000000000000" }]"#;
        assert!(matches!(
            Catalog::from_json(json),
            Err(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));
    }

    #[test]
    fn test_from_json() {
        let json = r#"[
            { "id": 20, "name": "Rust in Action", "category": "Books", "unitPrice": "39.99" },
            { "id": 21, "name": "USB Hub", "category": "Electronics", "unitPrice": 25 }
        ]"#;

        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(20).unwrap().unit_price, Money::from_cents(3999));
        assert_eq!(catalog.get(21).unwrap().category, Category::Electronics);
        assert_eq!(catalog.categories(), vec![Category::Electronics, Category::Books]);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(Catalog::from_json("{not json"), Err(CoreError::Catalog(_))));
        let unknown_category = r#"[{ "id": 1, "name": "Apple", "category": "Groceries", "unitPrice": "1" }]"#;
        assert!(Catalog::from_json(unknown_category).is_err());
    }
}
