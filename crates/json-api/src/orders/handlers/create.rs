//! Place Order Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::orders::{
    data::{NewOrder, NewOrderItem},
    records::{OrderUuid, PaymentMethod},
};

use crate::{
    extensions::*,
    observability::{OrderEvent, record_order_event},
    orders::{
        errors::into_status_error,
        models::{OrderResponse, ShippingAddressBody},
    },
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderItemRequest {
    pub product_id: Uuid,
    pub quantity: u32,
}

/// Place Order Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlaceOrderRequest {
    pub items: Vec<OrderItemRequest>,

    /// Total the client expects to pay, in pence/cents
    pub total_amount: u64,

    /// One of `Credit Card`, `PayPal`, `COD`, `UPI`
    pub payment_method: String,
    pub shipping_address: ShippingAddressBody,
}

impl PlaceOrderRequest {
    fn into_new_order(self, uuid: OrderUuid) -> Result<NewOrder, StatusError> {
        let payment_method = self.payment_method.parse::<PaymentMethod>().or_400()?;

        Ok(NewOrder {
            uuid,
            items: self
                .items
                .into_iter()
                .map(|item| NewOrderItem {
                    product_uuid: item.product_id.into(),
                    quantity: item.quantity,
                })
                .collect(),
            total_amount: self.total_amount,
            payment_method,
            shipping_address: self.shipping_address.into(),
        })
    }
}

/// Place Order Handler
///
/// Places an order for the authenticated account. Prices are taken from the catalog and
/// the declared total must match them.
#[endpoint(
    tags("orders"),
    summary = "Place Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Order failed validation"),
        (status_code = StatusCode::NOT_FOUND, description = "Product or account not found"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing or invalid token"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "orders.create",
    skip(json, depot, res),
    fields(
        account_uuid = tracing::field::Empty,
        order_uuid = tracing::field::Empty,
        items_count = tracing::field::Empty,
        total_amount = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<PlaceOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;
    let request = json.into_inner();
    let uuid = OrderUuid::new();

    let span = tracing::Span::current();

    span.record("account_uuid", tracing::field::display(principal.account));
    span.record("order_uuid", tracing::field::display(uuid));
    span.record("items_count", request.items.len());
    span.record("total_amount", request.total_amount);

    let order = request.into_new_order(uuid).inspect_err(|_rejected| {
        record_order_event(OrderEvent::Rejected);
    })?;

    let order = match state.app.orders.place_order(principal.account, order).await {
        Ok(order) => order,
        Err(error) => {
            let status = into_status_error(error);

            if status.code.is_client_error() {
                record_order_event(OrderEvent::Rejected);
            }

            return Err(status);
        }
    };

    record_order_event(OrderEvent::Placed);

    res.add_header(LOCATION, format!("/orders/{}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(order.into()))
}
