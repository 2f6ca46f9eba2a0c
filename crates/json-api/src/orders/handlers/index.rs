//! Order Index Handler

use std::sync::Arc;

use salvo::prelude::*;

use storefront_app::domain::orders::status::OrderStatus;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, models::OrdersResponse},
    state::State,
};

/// Order Index Handler
///
/// Lists every order, newest first. Accepts `status`, `page` and `limit` query parameters.
#[endpoint(
    tags("orders"),
    summary = "List Orders",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "A page of orders"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown status filter"),
        (status_code = StatusCode::FORBIDDEN, description = "Admin access required"),
    ),
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<OrdersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let status = req
        .query_text("status")
        .map(|status| status.parse::<OrderStatus>())
        .transpose()
        .or_400()?;

    let page = state
        .app
        .orders
        .list_orders(status, req.page_request())
        .await
        .map_err(into_status_error)?;

    Ok(Json(page.into()))
}
