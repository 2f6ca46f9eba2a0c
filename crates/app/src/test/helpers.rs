//! Test Helpers

use crate::{
    auth::Principal,
    domain::{
        accounts::{
            AccountsService, AccountsServiceError,
            data::{NewAccount, RegisteredAccount},
            records::AccountUuid,
        },
        orders::{
            OrdersService, OrdersServiceError,
            data::{NewOrder, NewOrderItem},
            records::{OrderRecord, OrderUuid, PaymentMethod, ShippingAddress},
        },
        products::{
            ProductsService, ProductsServiceError,
            data::NewProduct,
            records::{ProductRecord, ProductUuid},
        },
    },
    test::TestContext,
};

pub(crate) fn new_product(name: &str, category: &str, price: u64, stock: u32) -> NewProduct {
    NewProduct {
        uuid: ProductUuid::new(),
        name: name.to_string(),
        description: format!("{name} for testing"),
        price,
        category: category.to_string(),
        stock,
        images: vec![],
    }
}

pub(crate) async fn create_product(
    ctx: &TestContext,
    name: &str,
    price: u64,
    stock: u32,
) -> Result<ProductRecord, ProductsServiceError> {
    ctx.products
        .create_product(new_product(name, "electronics", price, stock))
        .await
}

/// Current stock of a product, including soft-deleted ones.
pub(crate) async fn stock_of(ctx: &TestContext, product: ProductUuid) -> Result<u32, sqlx::Error> {
    let stock: i32 = sqlx::query_scalar("SELECT stock FROM products WHERE uuid = $1")
        .bind(product.into_uuid())
        .fetch_one(ctx.db.pool())
        .await?;

    Ok(u32::try_from(stock).unwrap_or_default())
}

pub(crate) fn new_account(username: &str) -> NewAccount {
    NewAccount {
        uuid: AccountUuid::new(),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        is_admin: false,
    }
}

pub(crate) async fn register(
    ctx: &TestContext,
    username: &str,
    is_admin: bool,
) -> Result<RegisteredAccount, AccountsServiceError> {
    ctx.accounts
        .register_account(NewAccount {
            is_admin,
            ..new_account(username)
        })
        .await
}

pub(crate) fn principal(registered: &RegisteredAccount) -> Principal {
    Principal {
        account: registered.account.uuid,
        is_admin: registered.account.is_admin,
    }
}

pub(crate) fn shipping_address() -> ShippingAddress {
    ShippingAddress {
        street: "42 Wallaby Way".to_string(),
        city: "Sydney".to_string(),
        state: "NSW".to_string(),
        country: "Australia".to_string(),
        zip_code: "2000".to_string(),
        phone: "+61 2 9999 0000".to_string(),
    }
}

pub(crate) fn new_order(items: &[(ProductUuid, u32)], total_amount: u64) -> NewOrder {
    NewOrder {
        uuid: OrderUuid::new(),
        items: items
            .iter()
            .map(|(product_uuid, quantity)| NewOrderItem {
                product_uuid: *product_uuid,
                quantity: *quantity,
            })
            .collect(),
        total_amount,
        payment_method: PaymentMethod::CreditCard,
        shipping_address: shipping_address(),
    }
}

pub(crate) async fn place(
    ctx: &TestContext,
    account: AccountUuid,
    items: &[(ProductUuid, u32)],
    total_amount: u64,
) -> Result<OrderRecord, OrdersServiceError> {
    ctx.orders
        .place_order(account, new_order(items, total_amount))
        .await
}
