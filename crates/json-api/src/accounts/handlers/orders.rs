//! Account Order History Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    accounts::errors::into_status_error, extensions::*, orders::OrderListResponse, state::State,
};

/// Account Order History Handler
///
/// Orders placed by an account, oldest first. Only the account itself and admins may
/// read it.
#[endpoint(
    tags("accounts"),
    summary = "Account Order History",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order history"),
        (status_code = StatusCode::FORBIDDEN, description = "Account belongs to someone else"),
        (status_code = StatusCode::NOT_FOUND, description = "Account not found"),
    ),
)]
pub(crate) async fn handler(
    account: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderListResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let orders = state
        .app
        .accounts
        .order_history(principal, account.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(orders.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::{
        accounts::{AccountsServiceError, MockAccountsService},
        orders::{records::OrderUuid, status::OrderStatus},
    };

    use crate::test_helpers::{CUSTOMER, CUSTOMER_UUID, Mocks, OTHER_CUSTOMER_UUID, make_order};

    use super::*;

    fn make_service(accounts: MockAccountsService) -> Service {
        Mocks::with_accounts(accounts).service_as(
            CUSTOMER,
            Router::with_path("accounts/{account}/orders").get(handler),
        )
    }

    #[tokio::test]
    async fn test_history_of_own_account() -> TestResult {
        let order = OrderUuid::new();
        let mut accounts = MockAccountsService::new();

        accounts
            .expect_order_history()
            .once()
            .withf(|viewer, account| *viewer == CUSTOMER && *account == CUSTOMER_UUID)
            .return_once(move |_, account| {
                Ok(vec![make_order(order, account, OrderStatus::Delivered)])
            });

        let response: OrderListResponse =
            TestClient::get(format!("http://example.com/accounts/{CUSTOMER_UUID}/orders"))
                .send(&make_service(accounts))
                .await
                .take_json()
                .await?;

        assert_eq!(response.orders.len(), 1, "expected one order");

        Ok(())
    }

    #[tokio::test]
    async fn test_history_of_other_account_returns_403() -> TestResult {
        let mut accounts = MockAccountsService::new();

        accounts
            .expect_order_history()
            .once()
            .withf(|_, account| *account == OTHER_CUSTOMER_UUID)
            .return_once(|_, _| Err(AccountsServiceError::Forbidden));

        let res = TestClient::get(format!(
            "http://example.com/accounts/{OTHER_CUSTOMER_UUID}/orders"
        ))
        .send(&make_service(accounts))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
