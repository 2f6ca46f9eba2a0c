//! Current Account Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::accounts::records::AccountRecord;

use crate::{accounts::errors::into_status_error, extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AccountResponse {
    pub uuid: Uuid,
    pub username: String,
    pub email: String,
    pub is_admin: bool,

    /// Orders placed by the account, oldest first
    pub order_history: Vec<Uuid>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<AccountRecord> for AccountResponse {
    fn from(account: AccountRecord) -> Self {
        AccountResponse {
            uuid: account.uuid.into(),
            username: account.username,
            email: account.email,
            is_admin: account.is_admin,
            order_history: account.order_history.into_iter().map(Into::into).collect(),
            created_at: account.created_at.to_string(),
            updated_at: account.updated_at.to_string(),
        }
    }
}

/// Current Account Handler
///
/// Returns the account the bearer token belongs to.
#[endpoint(tags("accounts"), summary = "Current Account", security(("bearer_auth" = [])))]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<AccountResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let account = state
        .app
        .accounts
        .get_account(principal.account)
        .await
        .map_err(into_status_error)?;

    Ok(Json(account.into()))
}
