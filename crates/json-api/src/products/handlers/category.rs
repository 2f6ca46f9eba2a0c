//! Products By Category Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};

use crate::{
    extensions::*,
    products::{errors::into_status_error, index::ProductsResponse},
    state::State,
};

/// Products By Category Handler
///
/// Lists live products in one category, newest first.
#[endpoint(tags("products"), summary = "List Products In Category")]
pub(crate) async fn handler(
    category: PathParam<String>,
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<ProductsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let page = state
        .app
        .products
        .list_products_by_category(category.into_inner(), req.page_request())
        .await
        .map_err(into_status_error)?;

    Ok(Json(page.into()))
}
