//! Product Search Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    extensions::*,
    products::{errors::into_status_error, index::ProductsResponse},
    state::State,
};

/// Product Search Handler
///
/// Case-insensitive substring search over product names and descriptions, using the `q`
/// query parameter.
#[endpoint(
    tags("products"),
    summary = "Search Products",
    responses(
        (status_code = StatusCode::OK, description = "A page of matching products"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing search term"),
    ),
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<ProductsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let Some(term) = req.query_text("q") else {
        return Err(StatusError::bad_request().brief("Query parameter \"q\" is required"));
    };

    let page = state
        .app
        .products
        .search_products(term, req.page_request())
        .await
        .map_err(into_status_error)?;

    Ok(Json(page.into()))
}
