//! Delete Account Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{accounts::errors::into_status_error, extensions::*, state::State};

/// Delete Account Handler
///
/// Removes an account that has never placed an order. Only the account itself and
/// admins may.
#[endpoint(
    tags("accounts"),
    summary = "Delete Account",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Account deleted"),
        (status_code = StatusCode::FORBIDDEN, description = "Account belongs to someone else"),
        (status_code = StatusCode::NOT_FOUND, description = "Account not found"),
        (status_code = StatusCode::CONFLICT, description = "Account has placed orders"),
    ),
)]
#[tracing::instrument(
    name = "accounts.delete",
    skip(account, depot),
    fields(account_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    account: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;
    let account = account.into_inner();

    tracing::Span::current().record("account_uuid", tracing::field::display(account));

    state
        .app
        .accounts
        .delete_account(principal, account.into())
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::NO_CONTENT)
}
