//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use storefront_app::{
    auth::{MockAuthService, Principal},
    context::AppContext,
    domain::{
        accounts::{
            MockAccountsService,
            records::{AccountRecord, AccountUuid},
        },
        orders::{
            MockOrdersService,
            records::{
                OrderItemRecord, OrderRecord, OrderUuid, PaymentMethod, ShippingAddress,
            },
            status::OrderStatus,
        },
        products::{
            MockProductsService,
            records::{ProductRecord, ProductUuid},
        },
    },
};

use crate::{extensions::*, state::State};

pub(crate) const CUSTOMER_UUID: AccountUuid = AccountUuid::from_uuid(Uuid::from_u128(1));
pub(crate) const OTHER_CUSTOMER_UUID: AccountUuid = AccountUuid::from_uuid(Uuid::from_u128(2));
pub(crate) const ADMIN_UUID: AccountUuid = AccountUuid::from_uuid(Uuid::from_u128(3));

pub(crate) const CUSTOMER: Principal = Principal {
    account: CUSTOMER_UUID,
    is_admin: false,
};

pub(crate) const ADMIN: Principal = Principal {
    account: ADMIN_UUID,
    is_admin: true,
};

/// Hoop that authenticates every request as a fixed principal.
#[derive(Debug)]
pub(crate) struct InjectPrincipal(pub(crate) Principal);

#[salvo::handler]
impl InjectPrincipal {
    async fn handle(
        &self,
        req: &mut Request,
        depot: &mut Depot,
        res: &mut Response,
        ctrl: &mut FlowCtrl,
    ) {
        depot.insert_principal(self.0);
        ctrl.call_next(req, depot, res).await;
    }
}

/// Service doubles backing a test [`State`]. Unconfigured mocks panic when called.
#[derive(Default)]
pub(crate) struct Mocks {
    pub(crate) products: MockProductsService,
    pub(crate) orders: MockOrdersService,
    pub(crate) accounts: MockAccountsService,
    pub(crate) auth: MockAuthService,
}

impl Mocks {
    pub(crate) fn with_products(products: MockProductsService) -> Self {
        Self {
            products,
            ..Self::default()
        }
    }

    pub(crate) fn with_orders(orders: MockOrdersService) -> Self {
        Self {
            orders,
            ..Self::default()
        }
    }

    pub(crate) fn with_accounts(accounts: MockAccountsService) -> Self {
        Self {
            accounts,
            ..Self::default()
        }
    }

    pub(crate) fn into_state(self) -> Arc<State> {
        State::from_app_context(AppContext {
            products: Arc::new(self.products),
            orders: Arc::new(self.orders),
            accounts: Arc::new(self.accounts),
            auth: Arc::new(self.auth),
        })
    }

    /// `route` behind state injection only.
    pub(crate) fn service(self, route: Router) -> Service {
        Service::new(Router::new().hoop(inject(self.into_state())).push(route))
    }

    /// `route` behind state injection and a fixed authenticated principal.
    pub(crate) fn service_as(self, principal: Principal, route: Router) -> Service {
        Service::new(
            Router::new()
                .hoop(inject(self.into_state()))
                .hoop(InjectPrincipal(principal))
                .push(route),
        )
    }
}

pub(crate) fn make_account(uuid: AccountUuid, username: &str) -> AccountRecord {
    AccountRecord {
        uuid,
        username: username.to_string(),
        email: format!("{username}@example.com"),
        is_admin: uuid == ADMIN_UUID,
        order_history: vec![],
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_product(uuid: ProductUuid) -> ProductRecord {
    ProductRecord {
        uuid,
        name: "Wireless Headphones".to_string(),
        description: "Bluetooth over-ear headphones".to_string(),
        price: 2999,
        category: "electronics".to_string(),
        stock: 40,
        images: vec!["https://example.com/headphones.jpg".to_string()],
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        deleted_at: None,
    }
}

pub(crate) fn shipping_address() -> ShippingAddress {
    ShippingAddress {
        street: "1 Market St".to_string(),
        city: "Springfield".to_string(),
        state: "IL".to_string(),
        country: "US".to_string(),
        zip_code: "62701".to_string(),
        phone: "555-0100".to_string(),
    }
}

pub(crate) fn make_order(uuid: OrderUuid, account: AccountUuid, status: OrderStatus) -> OrderRecord {
    let product = ProductUuid::from_uuid(Uuid::from_u128(10));

    OrderRecord {
        uuid,
        account_uuid: account,
        items: vec![OrderItemRecord {
            product_uuid: product,
            quantity: 2,
            price_at_purchase: 1499,
        }],
        total_amount: 2998,
        status,
        payment_method: PaymentMethod::CreditCard,
        shipping_address: shipping_address(),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
