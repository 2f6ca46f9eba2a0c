//! Products Data

use crate::domain::products::records::ProductUuid;

/// Largest price, in minor units, that storage can hold.
pub const MAX_PRICE: u64 = i64::MAX.unsigned_abs();

/// Largest stock level that storage can hold.
pub const MAX_STOCK: u32 = i32::MAX.unsigned_abs();

/// New Product Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub name: String,
    pub description: String,
    pub price: u64,
    pub category: String,
    pub stock: u32,
    pub images: Vec<String>,
}

/// Product Update Data
///
/// Replaces every mutable field of the product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductUpdate {
    pub name: String,
    pub description: String,
    pub price: u64,
    pub category: String,
    pub stock: u32,
    pub images: Vec<String>,
}

/// Catalog listing filter. Unset fields do not constrain the listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
}

impl ProductFilter {
    #[must_use]
    pub fn by_category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            ..Self::default()
        }
    }
}
