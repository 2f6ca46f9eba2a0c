//! Update Account Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::accounts::data::AccountUpdate;

use crate::{
    accounts::{errors::into_status_error, me::AccountResponse},
    extensions::*,
    state::State,
};

/// Update Account Request
///
/// Omitted fields keep their current value.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateAccountRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl From<UpdateAccountRequest> for AccountUpdate {
    fn from(request: UpdateAccountRequest) -> Self {
        AccountUpdate {
            username: request.username,
            email: request.email,
        }
    }
}

/// Account Update Handler
///
/// Changes the username and/or email. Only the account itself and admins may.
#[endpoint(
    tags("accounts"),
    summary = "Update Account",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Account updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Blank or missing fields"),
        (status_code = StatusCode::FORBIDDEN, description = "Account belongs to someone else"),
        (status_code = StatusCode::NOT_FOUND, description = "Account not found"),
        (status_code = StatusCode::CONFLICT, description = "Username or email already registered"),
    ),
)]
#[tracing::instrument(
    name = "accounts.update",
    skip(account, json, depot),
    fields(account_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    account: PathParam<Uuid>,
    json: JsonBody<UpdateAccountRequest>,
    depot: &mut Depot,
) -> Result<Json<AccountResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;
    let account = account.into_inner();

    tracing::Span::current().record("account_uuid", tracing::field::display(account));

    let updated = state
        .app
        .accounts
        .update_account(principal, account.into(), json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(updated.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::domain::accounts::{AccountsServiceError, MockAccountsService};

    use crate::test_helpers::{
        CUSTOMER, CUSTOMER_UUID, Mocks, OTHER_CUSTOMER_UUID, make_account,
    };

    use super::*;

    fn make_service(accounts: MockAccountsService) -> Service {
        Mocks::with_accounts(accounts)
            .service_as(CUSTOMER, Router::with_path("accounts/{account}").put(handler))
    }

    #[tokio::test]
    async fn test_update_forwards_only_the_given_fields() -> TestResult {
        let mut accounts = MockAccountsService::new();

        accounts
            .expect_update_account()
            .once()
            .withf(|viewer, account, update| {
                *viewer == CUSTOMER
                    && *account == CUSTOMER_UUID
                    && *update
                        == AccountUpdate {
                            username: Some("Grace".to_string()),
                            email: None,
                        }
            })
            .return_once(|_, account, _| Ok(make_account(account, "grace")));

        let response: AccountResponse =
            TestClient::put(format!("http://example.com/accounts/{CUSTOMER_UUID}"))
                .json(&json!({ "username": "Grace" }))
                .send(&make_service(accounts))
                .await
                .take_json()
                .await?;

        assert_eq!(response.username, "grace");

        Ok(())
    }

    #[tokio::test]
    async fn test_update_other_account_returns_403() -> TestResult {
        let mut accounts = MockAccountsService::new();

        accounts
            .expect_update_account()
            .once()
            .return_once(|_, _, _| Err(AccountsServiceError::Forbidden));

        let res = TestClient::put(format!("http://example.com/accounts/{OTHER_CUSTOMER_UUID}"))
            .json(&json!({ "email": "mine@example.com" }))
            .send(&make_service(accounts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_to_taken_username_returns_409() -> TestResult {
        let mut accounts = MockAccountsService::new();

        accounts
            .expect_update_account()
            .once()
            .return_once(|_, _, _| Err(AccountsServiceError::AlreadyExists));

        let res = TestClient::put(format!("http://example.com/accounts/{CUSTOMER_UUID}"))
            .json(&json!({ "username": "taken" }))
            .send(&make_service(accounts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_blank_username_returns_400() -> TestResult {
        let mut accounts = MockAccountsService::new();

        accounts
            .expect_update_account()
            .once()
            .return_once(|_, _, _| {
                Err(AccountsServiceError::InvalidData("username must not be empty"))
            });

        let res = TestClient::put(format!("http://example.com/accounts/{CUSTOMER_UUID}"))
            .json(&json!({ "username": "   " }))
            .send(&make_service(accounts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
