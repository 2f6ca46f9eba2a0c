//! Products service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        pagination::{Page, PageRequest},
        products::{
            data::{MAX_PRICE, MAX_STOCK, NewProduct, ProductFilter, ProductUpdate},
            errors::ProductsServiceError,
            records::{ProductRecord, ProductUuid},
            repository::PgProductsRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    repository: PgProductsRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
        }
    }
}

#[async_trait]
impl ProductsService for PgProductsService {
    async fn list_products(
        &self,
        filter: ProductFilter,
        page: PageRequest,
    ) -> Result<Page<ProductRecord>, ProductsServiceError> {
        if filter
            .min_price
            .into_iter()
            .chain(filter.max_price)
            .any(|price| price > MAX_PRICE)
        {
            return Err(ProductsServiceError::InvalidData("price filter is out of range"));
        }

        if let (Some(min), Some(max)) = (filter.min_price, filter.max_price)
            && min > max
        {
            return Err(ProductsServiceError::InvalidData(
                "minimum price exceeds maximum price",
            ));
        }

        let mut tx = self.db.begin().await?;

        let items = self
            .repository
            .list_products(&mut tx, &filter, page)
            .await?;

        let total = self.repository.count_products(&mut tx, &filter).await?;

        tx.commit().await?;

        Ok(Page::new(items, total, page))
    }

    async fn list_products_by_category(
        &self,
        category: String,
        page: PageRequest,
    ) -> Result<Page<ProductRecord>, ProductsServiceError> {
        self.list_products(ProductFilter::by_category(category), page)
            .await
    }

    async fn search_products(
        &self,
        term: String,
        page: PageRequest,
    ) -> Result<Page<ProductRecord>, ProductsServiceError> {
        let term = term.trim();

        if term.is_empty() {
            return Err(ProductsServiceError::InvalidData(
                "search query must not be empty",
            ));
        }

        let mut tx = self.db.begin().await?;

        let items = self
            .repository
            .search_products(&mut tx, term, page)
            .await?;

        let total = self
            .repository
            .count_search_products(&mut tx, term)
            .await?;

        tx.commit().await?;

        Ok(Page::new(items, total, page))
    }

    async fn get_product(&self, product: ProductUuid) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let product = self.repository.get_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(product)
    }

    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let product = NewProduct {
            name: required(product.name, "product name must not be empty")?,
            category: required(product.category, "product category must not be empty")?,
            ..product
        };

        in_range(product.price, product.stock)?;

        let mut tx = self.db.begin().await?;

        let created = self.repository.create_product(&mut tx, &product).await?;

        tx.commit().await?;

        tracing::info!(product = %created.uuid, name = %created.name, "created product");

        Ok(created)
    }

    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let update = ProductUpdate {
            name: required(update.name, "product name must not be empty")?,
            category: required(update.category, "product category must not be empty")?,
            ..update
        };

        in_range(update.price, update.stock)?;

        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .update_product(&mut tx, product, &update)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_product(&mut tx, product).await?;

        if rows_affected == 0 {
            return Err(ProductsServiceError::NotFound);
        }

        tx.commit().await?;

        tracing::info!(%product, "deleted product");

        Ok(())
    }
}

fn required(value: String, message: &'static str) -> Result<String, ProductsServiceError> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(ProductsServiceError::InvalidData(message));
    }

    Ok(trimmed.to_string())
}

fn in_range(price: u64, stock: u32) -> Result<(), ProductsServiceError> {
    if price > MAX_PRICE {
        return Err(ProductsServiceError::InvalidData("product price is out of range"));
    }

    if stock > MAX_STOCK {
        return Err(ProductsServiceError::InvalidData("product stock is out of range"));
    }

    Ok(())
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Lists live products matching `filter`, newest first.
    async fn list_products(
        &self,
        filter: ProductFilter,
        page: PageRequest,
    ) -> Result<Page<ProductRecord>, ProductsServiceError>;

    /// Lists live products in a single category, newest first.
    async fn list_products_by_category(
        &self,
        category: String,
        page: PageRequest,
    ) -> Result<Page<ProductRecord>, ProductsServiceError>;

    /// Case-insensitive substring search over product names and descriptions.
    async fn search_products(
        &self,
        term: String,
        page: PageRequest,
    ) -> Result<Page<ProductRecord>, ProductsServiceError>;

    /// Retrieve a single live product.
    async fn get_product(&self, product: ProductUuid) -> Result<ProductRecord, ProductsServiceError>;

    /// Adds a product to the catalog.
    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Replaces every mutable field of a live product.
    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Soft-deletes a product. Existing orders keep referring to it.
    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::{TestContext, helpers::new_product};

    use super::*;

    #[tokio::test]
    async fn create_product_returns_stored_fields() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = ProductUuid::new();

        let product = ctx
            .products
            .create_product(NewProduct {
                uuid,
                name: "  Smart Watch ".to_string(),
                description: "Fitness tracking".to_string(),
                price: 4999,
                category: "electronics".to_string(),
                stock: 30,
                images: vec!["https://example.com/watch.jpg".to_string()],
            })
            .await?;

        assert_eq!(product.uuid, uuid);
        assert_eq!(product.name, "Smart Watch");
        assert_eq!(product.price, 4999);
        assert_eq!(product.stock, 30);
        assert_eq!(product.images, vec!["https://example.com/watch.jpg"]);
        assert!(product.deleted_at.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn create_product_with_blank_name_is_invalid() {
        let ctx = TestContext::new().await;

        let result = ctx
            .products
            .create_product(NewProduct {
                name: "   ".to_string(),
                ..new_product("ignored", "electronics", 100, 1)
            })
            .await;

        assert!(
            matches!(result, Err(ProductsServiceError::InvalidData(_))),
            "expected InvalidData, got {result:?}"
        );
    }

    #[tokio::test]
    async fn create_product_rejects_price_and_stock_beyond_storage_range() -> TestResult {
        let ctx = TestContext::new().await;

        let too_expensive = ctx
            .products
            .create_product(new_product("Gold Watch", "electronics", u64::MAX, 1))
            .await;

        assert!(
            matches!(
                too_expensive,
                Err(ProductsServiceError::InvalidData("product price is out of range"))
            ),
            "expected InvalidData, got {too_expensive:?}"
        );

        let overstocked = ctx
            .products
            .create_product(new_product("Sticker", "misc", 1, 3_000_000_000))
            .await;

        assert!(
            matches!(
                overstocked,
                Err(ProductsServiceError::InvalidData("product stock is out of range"))
            ),
            "expected InvalidData, got {overstocked:?}"
        );

        let at_limits = ctx
            .products
            .create_product(new_product("Ledger", "misc", MAX_PRICE, MAX_STOCK))
            .await?;

        assert_eq!(at_limits.price, MAX_PRICE);
        assert_eq!(at_limits.stock, MAX_STOCK);

        Ok(())
    }

    #[tokio::test]
    async fn create_product_duplicate_uuid_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;
        let product = new_product("Gaming Mouse", "electronics", 1499, 50);

        ctx.products.create_product(product.clone()).await?;

        let result = ctx.products.create_product(product).await;

        assert!(
            matches!(result, Err(ProductsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn get_product_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.products.get_product(ProductUuid::new()).await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn list_products_is_newest_first_and_paginated() -> TestResult {
        let ctx = TestContext::new().await;

        let mut created = Vec::new();

        for n in 0..5 {
            let product = ctx
                .products
                .create_product(new_product(&format!("Item {n}"), "misc", 100, 1))
                .await?;

            created.push(product.uuid);
        }

        let first = ctx
            .products
            .list_products(ProductFilter::default(), PageRequest::new(Some(1), Some(2)))
            .await?;

        let last = ctx
            .products
            .list_products(ProductFilter::default(), PageRequest::new(Some(3), Some(2)))
            .await?;

        let first_uuids: Vec<ProductUuid> = first.items.iter().map(|p| p.uuid).collect();
        let last_uuids: Vec<ProductUuid> = last.items.iter().map(|p| p.uuid).collect();

        assert_eq!(first.total, 5);
        assert_eq!(first.pages(), 3);
        assert_eq!(first_uuids, vec![created[4], created[3]]);
        assert_eq!(last_uuids, vec![created[0]]);

        Ok(())
    }

    #[tokio::test]
    async fn list_products_filters_by_category_and_price() -> TestResult {
        let ctx = TestContext::new().await;

        let cheap = ctx
            .products
            .create_product(new_product("Cable", "electronics", 500, 10))
            .await?;

        let mid = ctx
            .products
            .create_product(new_product("Headphones", "electronics", 2999, 10))
            .await?;

        ctx.products
            .create_product(new_product("Camera", "electronics", 35999, 10))
            .await?;

        ctx.products
            .create_product(new_product("Backpack", "accessories", 2500, 10))
            .await?;

        let page = ctx
            .products
            .list_products(
                ProductFilter {
                    category: Some("electronics".to_string()),
                    min_price: Some(500),
                    max_price: Some(3000),
                },
                PageRequest::default(),
            )
            .await?;

        let uuids: Vec<ProductUuid> = page.items.iter().map(|p| p.uuid).collect();

        assert_eq!(page.total, 2);
        assert_eq!(uuids, vec![mid.uuid, cheap.uuid]);

        Ok(())
    }

    #[tokio::test]
    async fn list_products_rejects_inverted_price_range() {
        let ctx = TestContext::new().await;

        let result = ctx
            .products
            .list_products(
                ProductFilter {
                    min_price: Some(10),
                    max_price: Some(5),
                    ..ProductFilter::default()
                },
                PageRequest::default(),
            )
            .await;

        assert!(
            matches!(result, Err(ProductsServiceError::InvalidData(_))),
            "expected InvalidData, got {result:?}"
        );
    }

    #[tokio::test]
    async fn list_products_rejects_price_filter_beyond_storage_range() {
        let ctx = TestContext::new().await;

        for filter in [
            ProductFilter {
                min_price: Some(u64::MAX),
                ..ProductFilter::default()
            },
            ProductFilter {
                max_price: Some(MAX_PRICE + 1),
                ..ProductFilter::default()
            },
        ] {
            let result = ctx
                .products
                .list_products(filter, PageRequest::default())
                .await;

            assert!(
                matches!(result, Err(ProductsServiceError::InvalidData(_))),
                "expected InvalidData, got {result:?}"
            );
        }
    }

    #[tokio::test]
    async fn list_products_by_category_only_returns_that_category() -> TestResult {
        let ctx = TestContext::new().await;

        let bag = ctx
            .products
            .create_product(new_product("Laptop Backpack", "accessories", 2500, 5))
            .await?;

        ctx.products
            .create_product(new_product("Gaming Mouse", "electronics", 1499, 5))
            .await?;

        let page = ctx
            .products
            .list_products_by_category("accessories".to_string(), PageRequest::default())
            .await?;

        assert_eq!(page.total, 1);
        assert_eq!(page.items.first().map(|p| p.uuid), Some(bag.uuid));

        Ok(())
    }

    #[tokio::test]
    async fn search_matches_name_or_description_case_insensitively() -> TestResult {
        let ctx = TestContext::new().await;

        let watch = ctx
            .products
            .create_product(new_product("Smart Watch", "electronics", 4999, 5))
            .await?;

        let camera = ctx
            .products
            .create_product(NewProduct {
                description: "Pairs with any smartphone".to_string(),
                ..new_product("DSLR Camera", "electronics", 35999, 5)
            })
            .await?;

        ctx.products
            .create_product(new_product("Gaming Mouse", "electronics", 1499, 5))
            .await?;

        let page = ctx
            .products
            .search_products("SMART".to_string(), PageRequest::default())
            .await?;

        let uuids: Vec<ProductUuid> = page.items.iter().map(|p| p.uuid).collect();

        assert_eq!(page.total, 2);
        assert_eq!(uuids, vec![camera.uuid, watch.uuid]);

        Ok(())
    }

    #[tokio::test]
    async fn search_treats_wildcards_literally() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.products
            .create_product(new_product("Gaming Mouse", "electronics", 1499, 5))
            .await?;

        let page = ctx
            .products
            .search_products("%".to_string(), PageRequest::default())
            .await?;

        assert_eq!(page.total, 0);
        assert!(page.items.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn update_product_replaces_fields() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx
            .products
            .create_product(new_product("Headphones", "electronics", 2999, 40))
            .await?;

        let updated = ctx
            .products
            .update_product(
                product.uuid,
                ProductUpdate {
                    name: "Wireless Headphones".to_string(),
                    description: "Noise cancelling".to_string(),
                    price: 3499,
                    category: "audio".to_string(),
                    stock: 12,
                    images: vec![],
                },
            )
            .await?;

        assert_eq!(updated.uuid, product.uuid);
        assert_eq!(updated.name, "Wireless Headphones");
        assert_eq!(updated.price, 3499);
        assert_eq!(updated.category, "audio");
        assert_eq!(updated.stock, 12);

        Ok(())
    }

    #[tokio::test]
    async fn update_product_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .products
            .update_product(
                ProductUuid::new(),
                ProductUpdate {
                    name: "Nothing".to_string(),
                    description: String::new(),
                    price: 1,
                    category: "misc".to_string(),
                    stock: 1,
                    images: vec![],
                },
            )
            .await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn update_product_rejects_stock_beyond_storage_range() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx
            .products
            .create_product(new_product("Gaming Mouse", "electronics", 1499, 50))
            .await?;

        let result = ctx
            .products
            .update_product(
                product.uuid,
                ProductUpdate {
                    name: product.name.clone(),
                    description: product.description.clone(),
                    price: product.price,
                    category: product.category.clone(),
                    stock: u32::MAX,
                    images: product.images.clone(),
                },
            )
            .await;

        assert!(
            matches!(result, Err(ProductsServiceError::InvalidData(_))),
            "expected InvalidData, got {result:?}"
        );

        let unchanged = ctx.products.get_product(product.uuid).await?;

        assert_eq!(unchanged.stock, 50);

        Ok(())
    }

    #[tokio::test]
    async fn deleted_product_is_hidden_from_reads() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx
            .products
            .create_product(new_product("Old Stock", "misc", 100, 1))
            .await?;

        ctx.products.delete_product(product.uuid).await?;

        let get = ctx.products.get_product(product.uuid).await;

        let list = ctx
            .products
            .list_products(ProductFilter::default(), PageRequest::default())
            .await?;

        let search = ctx
            .products
            .search_products("Old".to_string(), PageRequest::default())
            .await?;

        assert!(
            matches!(get, Err(ProductsServiceError::NotFound)),
            "expected NotFound after deletion, got {get:?}"
        );
        assert_eq!(list.total, 0);
        assert_eq!(search.total, 0);

        Ok(())
    }

    #[tokio::test]
    async fn delete_product_twice_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx
            .products
            .create_product(new_product("Once", "misc", 100, 1))
            .await?;

        ctx.products.delete_product(product.uuid).await?;

        let result = ctx.products.delete_product(product.uuid).await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }
}
