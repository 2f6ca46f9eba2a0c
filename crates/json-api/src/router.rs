//! App Router

use salvo::Router;

use crate::{accounts, auth, orders, products};

/// Every API route, grouped by the credentials it needs.
///
/// Literal segments (`search`, `category`, `mine`, `me`) are pushed before their
/// `{uuid}` siblings so they are matched first.
pub(crate) fn app_router() -> Router {
    Router::new()
        .push(public_router())
        .push(
            Router::new()
                .hoop(auth::middleware::handler)
                .push(customer_router())
                .push(
                    Router::new()
                        .hoop(auth::middleware::require_admin)
                        .push(admin_router()),
                ),
        )
}

fn public_router() -> Router {
    Router::new()
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .push(Router::with_path("search").get(products::search::handler))
                .push(Router::with_path("category/{category}").get(products::category::handler))
                .push(Router::with_path("{product}").get(products::get::handler)),
        )
        .push(Router::with_path("accounts").post(accounts::create::handler))
}

fn customer_router() -> Router {
    Router::new()
        .push(
            Router::with_path("orders")
                .post(orders::create::handler)
                .push(Router::with_path("mine").get(orders::mine::handler))
                .push(Router::with_path("{order}").get(orders::get::handler)),
        )
        .push(
            Router::with_path("accounts")
                .push(Router::with_path("me").get(accounts::me::handler))
                .push(
                    Router::with_path("{account}")
                        .get(accounts::get::handler)
                        .put(accounts::update::handler)
                        .delete(accounts::delete::handler)
                        .push(Router::with_path("orders").get(accounts::orders::handler)),
                ),
        )
}

fn admin_router() -> Router {
    Router::new()
        .push(
            Router::with_path("products")
                .post(products::create::handler)
                .push(
                    Router::with_path("{product}")
                        .put(products::update::handler)
                        .delete(products::delete::handler),
                ),
        )
        .push(
            Router::with_path("orders")
                .get(orders::index::handler)
                .push(Router::with_path("{order}/status").put(orders::status::handler)),
        )
        .push(Router::with_path("accounts").get(accounts::index::handler))
}
