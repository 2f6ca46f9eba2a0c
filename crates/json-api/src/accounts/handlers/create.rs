//! Register Account Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::domain::accounts::{data::NewAccount, records::AccountUuid};

use crate::{
    accounts::{errors::into_status_error, me::AccountResponse},
    extensions::*,
    state::State,
};

/// Register Account Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RegisterAccountRequest {
    pub username: String,
    pub email: String,
}

/// Account Registered Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AccountRegisteredResponse {
    pub account: AccountResponse,

    /// Bearer token for the new account. It is only shown once.
    pub token: String,
}

/// Register Account Handler
///
/// Creates a customer account and returns its API token.
#[endpoint(
    tags("accounts"),
    summary = "Register Account",
    responses(
        (status_code = StatusCode::CREATED, description = "Account registered"),
        (status_code = StatusCode::BAD_REQUEST, description = "Blank username or email"),
        (status_code = StatusCode::CONFLICT, description = "Username or email taken"),
    ),
)]
#[tracing::instrument(name = "accounts.create", skip_all, err)]
pub(crate) async fn handler(
    json: JsonBody<RegisterAccountRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<AccountRegisteredResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let registered = state
        .app
        .accounts
        .register_account(NewAccount {
            uuid: AccountUuid::new(),
            username: request.username,
            email: request.email,
            is_admin: false,
        })
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, "/accounts/me", true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(AccountRegisteredResponse {
        account: registered.account.into(),
        token: registered.token,
    }))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::domain::accounts::{
        AccountsServiceError, MockAccountsService, data::RegisteredAccount,
        records::AccountRecord,
    };

    use crate::test_helpers::Mocks;

    use super::*;

    fn make_service(accounts: MockAccountsService) -> Service {
        Mocks::with_accounts(accounts).service(Router::with_path("accounts").post(handler))
    }

    #[tokio::test]
    async fn test_register_returns_token_once() -> TestResult {
        let mut accounts = MockAccountsService::new();

        accounts
            .expect_register_account()
            .once()
            .withf(|new| {
                new.username == "ada" && new.email == "ada@example.com" && !new.is_admin
            })
            .return_once(|new| {
                Ok(RegisteredAccount {
                    account: AccountRecord {
                        uuid: new.uuid,
                        username: new.username,
                        email: new.email,
                        is_admin: new.is_admin,
                        order_history: vec![],
                        created_at: Timestamp::UNIX_EPOCH,
                        updated_at: Timestamp::UNIX_EPOCH,
                    },
                    token: "sf_0123".to_string(),
                })
            });

        let mut res = TestClient::post("http://example.com/accounts")
            .json(&json!({ "username": "ada", "email": "ada@example.com" }))
            .send(&make_service(accounts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        let body: AccountRegisteredResponse = res.take_json().await?;

        assert_eq!(body.token, "sf_0123");
        assert_eq!(body.account.username, "ada");
        assert!(!body.account.is_admin, "public registration never grants admin");

        Ok(())
    }

    #[tokio::test]
    async fn test_register_cannot_request_admin() -> TestResult {
        let mut accounts = MockAccountsService::new();

        accounts
            .expect_register_account()
            .once()
            .withf(|new| !new.is_admin)
            .return_once(|_| Err(AccountsServiceError::AlreadyExists));

        let res = TestClient::post("http://example.com/accounts")
            .json(&json!({ "username": "eve", "email": "eve@example.com", "isAdmin": true }))
            .send(&make_service(accounts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_register_blank_username_returns_400() -> TestResult {
        let mut accounts = MockAccountsService::new();

        accounts
            .expect_register_account()
            .once()
            .return_once(|_| {
                Err(AccountsServiceError::InvalidData(
                    "username must not be empty",
                ))
            });

        let res = TestClient::post("http://example.com/accounts")
            .json(&json!({ "username": " ", "email": "blank@example.com" }))
            .send(&make_service(accounts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
