//! Get Account Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    accounts::{errors::into_status_error, me::AccountResponse},
    extensions::*,
    state::State,
};

/// Get Account Handler
///
/// Only the account itself and admins may read it.
#[endpoint(
    tags("accounts"),
    summary = "Get Account",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Account found"),
        (status_code = StatusCode::FORBIDDEN, description = "Account belongs to someone else"),
        (status_code = StatusCode::NOT_FOUND, description = "Account not found"),
    ),
)]
pub(crate) async fn handler(
    account: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<AccountResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let account = state
        .app
        .accounts
        .view_account(principal, account.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(account.into()))
}
