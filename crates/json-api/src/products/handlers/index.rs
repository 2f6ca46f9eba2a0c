//! Product Index Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use storefront_app::domain::{
    pagination::Page,
    products::{data::ProductFilter, records::ProductRecord},
};

use crate::{
    extensions::*,
    pagination::PaginationResponse,
    products::{errors::into_status_error, get::ProductResponse},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductsResponse {
    /// The products on this page
    pub items: Vec<ProductResponse>,

    pub pagination: PaginationResponse,
}

impl From<Page<ProductRecord>> for ProductsResponse {
    fn from(page: Page<ProductRecord>) -> Self {
        let pagination = PaginationResponse::from(&page);

        ProductsResponse {
            items: page.items.into_iter().map(Into::into).collect(),
            pagination,
        }
    }
}

/// Product Index Handler
///
/// Lists live products, newest first. Accepts `page`, `limit`, `category`, `minPrice`
/// and `maxPrice` query parameters.
#[endpoint(
    tags("products"),
    summary = "List Products",
    responses(
        (status_code = StatusCode::OK, description = "A page of products"),
        (status_code = StatusCode::BAD_REQUEST, description = "Inverted or out of range price filter"),
    ),
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<ProductsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let filter = ProductFilter {
        category: req.query_text("category"),
        min_price: req.query::<u64>("minPrice"),
        max_price: req.query::<u64>("maxPrice"),
    };

    let page = state
        .app
        .products
        .list_products(filter, req.page_request())
        .await
        .map_err(into_status_error)?;

    Ok(Json(page.into()))
}
