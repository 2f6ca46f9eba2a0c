//! Accounts Data

use crate::domain::accounts::{
    errors::AccountsServiceError,
    records::{AccountRecord, AccountUuid},
};

/// New Account Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub uuid: AccountUuid,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
}

impl NewAccount {
    /// Trims and lowercases the username and email.
    ///
    /// # Errors
    ///
    /// Returns [`AccountsServiceError::InvalidData`] when either is blank.
    pub fn normalized(self) -> Result<Self, AccountsServiceError> {
        let username = normalize(&self.username, "username must not be empty")?;
        let email = normalize(&self.email, "email must not be empty")?;

        Ok(Self {
            username,
            email,
            ..self
        })
    }
}

/// Account Update Data
///
/// Unset fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
}

impl AccountUpdate {
    /// Trims and lowercases whichever fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`AccountsServiceError::InvalidData`] when a set field is blank or
    /// when nothing is set.
    pub fn normalized(self) -> Result<Self, AccountsServiceError> {
        let username = self
            .username
            .map(|username| normalize(&username, "username must not be empty"))
            .transpose()?;

        let email = self
            .email
            .map(|email| normalize(&email, "email must not be empty"))
            .transpose()?;

        if username.is_none() && email.is_none() {
            return Err(AccountsServiceError::InvalidData(
                "update must set a username or an email",
            ));
        }

        Ok(Self { username, email })
    }
}

fn normalize(value: &str, message: &'static str) -> Result<String, AccountsServiceError> {
    let normalized = value.trim().to_lowercase();

    if normalized.is_empty() {
        return Err(AccountsServiceError::InvalidData(message));
    }

    Ok(normalized)
}

/// A newly registered account with its one-time API token.
#[derive(Debug, Clone)]
pub struct RegisteredAccount {
    pub account: AccountRecord,

    /// Raw bearer token. Only its hash is stored, so it cannot be shown again.
    pub token: String,
}
