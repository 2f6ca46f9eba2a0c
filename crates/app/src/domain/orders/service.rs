//! Orders service.
//!
//! Placement and status changes each run in a single transaction. Product rows are
//! locked before stock is checked and decremented, and the order row is locked before
//! its status changes, so concurrent requests serialise on the rows they touch.

use std::collections::BTreeMap;

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashMap;

use crate::{
    auth::Principal,
    database::Db,
    domain::{
        accounts::{records::AccountUuid, repository::PgAccountsRepository},
        orders::{
            data::NewOrder,
            errors::OrdersServiceError,
            records::{OrderItemRecord, OrderRecord, OrderUuid},
            repositories::{PgOrderItemsRepository, PgOrdersRepository},
            status::OrderStatus,
        },
        pagination::{Page, PageRequest},
        products::{
            data::MAX_PRICE,
            records::{ProductRecord, ProductUuid},
            repository::PgProductsRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    orders_repository: PgOrdersRepository,
    items_repository: PgOrderItemsRepository,
    products_repository: PgProductsRepository,
    accounts_repository: PgAccountsRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            orders_repository: PgOrdersRepository::new(),
            items_repository: PgOrderItemsRepository::new(),
            products_repository: PgProductsRepository::new(),
            accounts_repository: PgAccountsRepository::new(),
        }
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn place_order(
        &self,
        account: AccountUuid,
        order: NewOrder,
    ) -> Result<OrderRecord, OrdersServiceError> {
        order.validate()?;

        let order = NewOrder {
            shipping_address: order.shipping_address.trimmed(),
            ..order
        };

        let requested = order.requested_quantities();

        let mut tx = self.db.begin().await?;

        self.accounts_repository
            .get_account(&mut tx, account)
            .await
            .map_err(|error| match OrdersServiceError::from(error) {
                OrdersServiceError::NotFound => OrdersServiceError::AccountNotFound,
                other => other,
            })?;

        let product_uuids: Vec<ProductUuid> = requested.iter().map(|(uuid, _)| *uuid).collect();

        let products: FxHashMap<ProductUuid, ProductRecord> = self
            .products_repository
            .lock_products(&mut tx, &product_uuids)
            .await?
            .into_iter()
            .map(|product| (product.uuid, product))
            .collect();

        for (uuid, quantity) in &requested {
            let product = products
                .get(uuid)
                .ok_or(OrdersServiceError::ProductNotFound(*uuid))?;

            if *quantity > product.stock {
                return Err(insufficient_stock(product, *quantity));
            }
        }

        let items = price_items(&order, &products)?;
        let computed = total_of(&items)?;

        if computed != order.total_amount {
            return Err(OrdersServiceError::TotalMismatch {
                declared: order.total_amount,
                computed,
            });
        }

        let mut created = self
            .orders_repository
            .create_order(&mut tx, account, &order, computed)
            .await?;

        self.items_repository
            .create_items(&mut tx, created.uuid, &items)
            .await?;

        for (uuid, quantity) in &requested {
            let decremented = self
                .products_repository
                .decrement_stock(&mut tx, *uuid, *quantity)
                .await?;

            if !decremented {
                let product = products
                    .get(uuid)
                    .ok_or(OrdersServiceError::ProductNotFound(*uuid))?;

                return Err(insufficient_stock(product, *quantity));
            }
        }

        let appended = self
            .accounts_repository
            .append_order_history(&mut tx, account, created.uuid)
            .await?;

        if appended == 0 {
            return Err(OrdersServiceError::AccountNotFound);
        }

        tx.commit().await?;

        created.items = items;

        tracing::info!(
            order = %created.uuid,
            account = %account,
            items = created.items.len(),
            total_amount = created.total_amount,
            payment_method = %created.payment_method,
            "placed order"
        );

        Ok(created)
    }

    async fn get_order(
        &self,
        viewer: Principal,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.orders_repository.get_order(&mut tx, order).await?;

        if !viewer.can_view(record.account_uuid) {
            return Err(OrdersServiceError::Forbidden);
        }

        let mut records = self
            .items_repository
            .attach_items(&mut tx, vec![record])
            .await?;

        tx.commit().await?;

        records.pop().ok_or(OrdersServiceError::NotFound)
    }

    async fn list_orders(
        &self,
        status: Option<OrderStatus>,
        page: PageRequest,
    ) -> Result<Page<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let orders = self
            .orders_repository
            .list_orders(&mut tx, status, page)
            .await?;

        let orders = self.items_repository.attach_items(&mut tx, orders).await?;

        let total = self.orders_repository.count_orders(&mut tx, status).await?;

        tx.commit().await?;

        Ok(Page::new(orders, total, page))
    }

    async fn list_account_orders(
        &self,
        account: AccountUuid,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let orders = self
            .orders_repository
            .list_account_orders(&mut tx, account)
            .await?;

        let orders = self.items_repository.attach_items(&mut tx, orders).await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn update_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self.orders_repository.lock_order(&mut tx, order).await?;

        if !current.status.can_become(status) {
            return Err(OrdersServiceError::InvalidTransition {
                from: current.status,
                to: status,
            });
        }

        let mut items = self.items_repository.list_items(&mut tx, &[order]).await?;
        let items = items.remove(&order).unwrap_or_default();

        if current.status == status {
            tx.commit().await?;

            return Ok(OrderRecord { items, ..current });
        }

        if current.status.restocks_on(status) {
            for (product, quantity) in restock_quantities(&items) {
                self.products_repository
                    .restore_stock(&mut tx, product, quantity)
                    .await?;
            }
        }

        let updated = self
            .orders_repository
            .update_status(&mut tx, order, status)
            .await?;

        tx.commit().await?;

        tracing::info!(
            order = %order,
            from = %current.status,
            to = %status,
            restocked = current.status.restocks_on(status),
            "changed order status"
        );

        Ok(OrderRecord { items, ..updated })
    }
}

/// Quantities to put back per product, in UUID order so concurrent cancellations
/// lock product rows in the same order as placement does.
fn restock_quantities(items: &[OrderItemRecord]) -> BTreeMap<ProductUuid, u32> {
    let mut quantities = BTreeMap::new();

    for item in items {
        let quantity: &mut u32 = quantities.entry(item.product_uuid).or_default();
        *quantity = quantity.saturating_add(item.quantity);
    }

    quantities
}

fn insufficient_stock(product: &ProductRecord, requested: u32) -> OrdersServiceError {
    OrdersServiceError::InsufficientStock {
        product: product.uuid,
        name: product.name.clone(),
        requested,
        available: product.stock,
    }
}

/// Line items with the current catalog price captured, in request order.
fn price_items(
    order: &NewOrder,
    products: &FxHashMap<ProductUuid, ProductRecord>,
) -> Result<Vec<OrderItemRecord>, OrdersServiceError> {
    order
        .items
        .iter()
        .map(|item| {
            products
                .get(&item.product_uuid)
                .map(|product| OrderItemRecord {
                    product_uuid: item.product_uuid,
                    quantity: item.quantity,
                    price_at_purchase: product.price,
                })
                .ok_or(OrdersServiceError::ProductNotFound(item.product_uuid))
        })
        .collect()
}

fn total_of(items: &[OrderItemRecord]) -> Result<u64, OrdersServiceError> {
    items
        .iter()
        .try_fold(0_u64, |total, item| {
            item.line_total().and_then(|line| total.checked_add(line))
        })
        .filter(|total| *total <= MAX_PRICE)
        .ok_or(OrdersServiceError::InvalidData("order total is too large"))
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Places an order for `account`, taking the requested quantities out of stock.
    ///
    /// Either every effect (order row, items, stock decrements, history append) is
    /// committed or none is.
    async fn place_order(
        &self,
        account: AccountUuid,
        order: NewOrder,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Retrieve a single order visible to `viewer`.
    async fn get_order(
        &self,
        viewer: Principal,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Lists every order, newest first, optionally restricted to one status.
    async fn list_orders(
        &self,
        status: Option<OrderStatus>,
        page: PageRequest,
    ) -> Result<Page<OrderRecord>, OrdersServiceError>;

    /// Lists the orders placed by `account`, newest first.
    async fn list_account_orders(
        &self,
        account: AccountUuid,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// Moves an order to `status`. Entering `cancelled` puts its items back into stock.
    async fn update_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<OrderRecord, OrdersServiceError>;
}
