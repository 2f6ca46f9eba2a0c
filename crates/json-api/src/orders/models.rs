//! Order Models

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::{
    orders::records::{OrderItemRecord, OrderRecord, ShippingAddress},
    pagination::Page,
};

use crate::pagination::PaginationResponse;

/// Shipping address, used in both requests and responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ShippingAddressBody {
    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip_code: String,
    pub phone: String,
}

impl From<ShippingAddressBody> for ShippingAddress {
    fn from(body: ShippingAddressBody) -> Self {
        ShippingAddress {
            street: body.street,
            city: body.city,
            state: body.state,
            country: body.country,
            zip_code: body.zip_code,
            phone: body.phone,
        }
    }
}

impl From<ShippingAddress> for ShippingAddressBody {
    fn from(address: ShippingAddress) -> Self {
        ShippingAddressBody {
            street: address.street,
            city: address.city,
            state: address.state,
            country: address.country,
            zip_code: address.zip_code,
            phone: address.phone,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderItemResponse {
    pub product_id: Uuid,
    pub quantity: u32,

    /// Unit price captured when the order was placed, in pence/cents
    pub price_at_purchase: u64,
}

impl From<OrderItemRecord> for OrderItemResponse {
    fn from(item: OrderItemRecord) -> Self {
        OrderItemResponse {
            product_id: item.product_uuid.into(),
            quantity: item.quantity,
            price_at_purchase: item.price_at_purchase,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderResponse {
    pub uuid: Uuid,
    pub account_uuid: Uuid,
    pub items: Vec<OrderItemResponse>,

    /// Order total in pence/cents
    pub total_amount: u64,

    /// One of `pending`, `shipped`, `delivered`, `cancelled`
    pub status: String,

    /// One of `Credit Card`, `PayPal`, `COD`, `UPI`
    pub payment_method: String,
    pub shipping_address: ShippingAddressBody,
    pub created_at: String,
    pub updated_at: String,
}

impl From<OrderRecord> for OrderResponse {
    fn from(order: OrderRecord) -> Self {
        OrderResponse {
            uuid: order.uuid.into(),
            account_uuid: order.account_uuid.into(),
            items: order.items.into_iter().map(Into::into).collect(),
            total_amount: order.total_amount,
            status: order.status.to_string(),
            payment_method: order.payment_method.to_string(),
            shipping_address: order.shipping_address.into(),
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}

/// Unpaginated list of orders
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderListResponse {
    pub orders: Vec<OrderResponse>,
}

impl From<Vec<OrderRecord>> for OrderListResponse {
    fn from(orders: Vec<OrderRecord>) -> Self {
        OrderListResponse {
            orders: orders.into_iter().map(Into::into).collect(),
        }
    }
}

/// One page of orders
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrdersResponse {
    pub items: Vec<OrderResponse>,
    pub pagination: PaginationResponse,
}

impl From<Page<OrderRecord>> for OrdersResponse {
    fn from(page: Page<OrderRecord>) -> Self {
        let pagination = PaginationResponse::from(&page);

        OrdersResponse {
            items: page.items.into_iter().map(Into::into).collect(),
            pagination,
        }
    }
}
