//! Account Records

use jiff::Timestamp;

use crate::{domain::orders::records::OrderUuid, uuids::TypedUuid};

/// Account UUID
pub type AccountUuid = TypedUuid<AccountRecord>;

/// Account Record
#[derive(Debug, Clone, PartialEq)]
pub struct AccountRecord {
    pub uuid: AccountUuid,
    pub username: String,
    pub email: String,
    pub is_admin: bool,

    /// Orders placed by this account, oldest first.
    pub order_history: Vec<OrderUuid>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
