//! Auth data models.

use crate::domain::accounts::records::AccountUuid;

/// The authenticated caller behind a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    /// Account the presented token belongs to.
    pub account: AccountUuid,

    /// Whether the account may use admin operations.
    pub is_admin: bool,
}

impl Principal {
    /// `true` when the caller is `account` or an admin.
    #[must_use]
    pub fn can_view(&self, account: AccountUuid) -> bool {
        self.is_admin || self.account == account
    }
}
