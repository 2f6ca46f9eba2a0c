//! Account Index Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use storefront_app::domain::{accounts::records::AccountRecord, pagination::Page};

use crate::{
    accounts::{errors::into_status_error, me::AccountResponse},
    extensions::*,
    pagination::PaginationResponse,
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AccountsResponse {
    pub items: Vec<AccountResponse>,
    pub pagination: PaginationResponse,
}

impl From<Page<AccountRecord>> for AccountsResponse {
    fn from(page: Page<AccountRecord>) -> Self {
        let page = page.map(AccountResponse::from);

        AccountsResponse {
            pagination: PaginationResponse::from(&page),
            items: page.items,
        }
    }
}

/// Account Index Handler
///
/// Lists every account, newest first. Accepts `page` and `limit` query parameters.
#[endpoint(
    tags("accounts"),
    summary = "List Accounts",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "A page of accounts"),
        (status_code = StatusCode::FORBIDDEN, description = "Admin access required"),
    ),
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<AccountsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let page = state
        .app
        .accounts
        .list_accounts(req.page_request())
        .await
        .map_err(into_status_error)?;

    Ok(Json(page.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::{
        accounts::{AccountsServiceError, MockAccountsService},
        pagination::PageRequest,
    };

    use crate::test_helpers::{ADMIN, ADMIN_UUID, CUSTOMER_UUID, Mocks, make_account};

    use super::*;

    fn make_service(accounts: MockAccountsService) -> Service {
        Mocks::with_accounts(accounts).service_as(ADMIN, Router::with_path("accounts").get(handler))
    }

    #[tokio::test]
    async fn test_index_lists_accounts_with_pagination() -> TestResult {
        let mut accounts = MockAccountsService::new();

        accounts
            .expect_list_accounts()
            .once()
            .withf(|page| *page == PageRequest::new(Some(2), Some(2)))
            .return_once(|page| {
                Ok(Page::new(
                    vec![
                        make_account(ADMIN_UUID, "root"),
                        make_account(CUSTOMER_UUID, "ada"),
                    ],
                    5,
                    page,
                ))
            });

        let body: serde_json::Value = TestClient::get("http://example.com/accounts?page=2&limit=2")
            .send(&make_service(accounts))
            .await
            .take_json()
            .await?;

        assert_eq!(body["items"][0]["username"], "root");
        assert_eq!(body["items"][0]["isAdmin"], true);
        assert_eq!(body["items"][1]["email"], "ada@example.com");
        assert_eq!(body["pagination"]["total"], 5);
        assert_eq!(body["pagination"]["pages"], 3);

        Ok(())
    }

    #[tokio::test]
    async fn test_index_storage_error_returns_500() -> TestResult {
        let mut accounts = MockAccountsService::new();

        accounts
            .expect_list_accounts()
            .once()
            .return_once(|_| Err(AccountsServiceError::Sql(sqlx::Error::PoolTimedOut)));

        let res = TestClient::get("http://example.com/accounts")
            .send(&make_service(accounts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }
}
