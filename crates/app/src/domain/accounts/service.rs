//! Accounts service.

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashMap;

use crate::{
    auth::{Principal, issue_api_token},
    database::Db,
    domain::{
        accounts::{
            data::{AccountUpdate, NewAccount, RegisteredAccount},
            errors::AccountsServiceError,
            records::{AccountRecord, AccountUuid},
            repository::PgAccountsRepository,
        },
        orders::{
            records::OrderRecord,
            repositories::{PgOrderItemsRepository, PgOrdersRepository},
        },
        pagination::{Page, PageRequest},
    },
};

#[derive(Debug, Clone)]
pub struct PgAccountsService {
    db: Db,
    repository: PgAccountsRepository,
    orders_repository: PgOrdersRepository,
    items_repository: PgOrderItemsRepository,
}

impl PgAccountsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgAccountsRepository::new(),
            orders_repository: PgOrdersRepository::new(),
            items_repository: PgOrderItemsRepository::new(),
        }
    }
}

#[async_trait]
impl AccountsService for PgAccountsService {
    async fn register_account(
        &self,
        account: NewAccount,
    ) -> Result<RegisteredAccount, AccountsServiceError> {
        let account = account.normalized()?;
        let issued = issue_api_token();

        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_account(&mut tx, &account, &issued.credential_hash)
            .await?;

        tx.commit().await?;

        tracing::info!(
            account = %created.uuid,
            username = %created.username,
            is_admin = created.is_admin,
            "registered account"
        );

        Ok(RegisteredAccount {
            account: created,
            token: issued.token,
        })
    }

    async fn get_account(&self, account: AccountUuid) -> Result<AccountRecord, AccountsServiceError> {
        let mut tx = self.db.begin().await?;

        let account = self.repository.get_account(&mut tx, account).await?;

        tx.commit().await?;

        Ok(account)
    }

    async fn list_accounts(
        &self,
        page: PageRequest,
    ) -> Result<Page<AccountRecord>, AccountsServiceError> {
        let mut tx = self.db.begin().await?;

        let items = self.repository.list_accounts(&mut tx, page).await?;
        let total = self.repository.count_accounts(&mut tx).await?;

        tx.commit().await?;

        Ok(Page::new(items, total, page))
    }

    async fn view_account(
        &self,
        viewer: Principal,
        account: AccountUuid,
    ) -> Result<AccountRecord, AccountsServiceError> {
        if !viewer.can_view(account) {
            return Err(AccountsServiceError::Forbidden);
        }

        self.get_account(account).await
    }

    async fn update_account(
        &self,
        viewer: Principal,
        account: AccountUuid,
        update: AccountUpdate,
    ) -> Result<AccountRecord, AccountsServiceError> {
        if !viewer.can_view(account) {
            return Err(AccountsServiceError::Forbidden);
        }

        let update = update.normalized()?;

        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .update_account(&mut tx, account, &update)
            .await?;

        tx.commit().await?;

        tracing::info!(
            account = %updated.uuid,
            updated_by = %viewer.account,
            "updated account"
        );

        Ok(updated)
    }

    async fn delete_account(
        &self,
        viewer: Principal,
        account: AccountUuid,
    ) -> Result<(), AccountsServiceError> {
        if !viewer.can_view(account) {
            return Err(AccountsServiceError::Forbidden);
        }

        let mut tx = self.db.begin().await?;

        let rows_affected = self
            .repository
            .delete_account(&mut tx, account)
            .await
            .map_err(|error| match AccountsServiceError::from(error) {
                AccountsServiceError::InvalidReference => AccountsServiceError::HasOrders,
                other => other,
            })?;

        if rows_affected == 0 {
            return Err(AccountsServiceError::NotFound);
        }

        tx.commit().await?;

        tracing::info!(%account, deleted_by = %viewer.account, "deleted account");

        Ok(())
    }

    async fn order_history(
        &self,
        viewer: Principal,
        account: AccountUuid,
    ) -> Result<Vec<OrderRecord>, AccountsServiceError> {
        if !viewer.can_view(account) {
            return Err(AccountsServiceError::Forbidden);
        }

        let mut tx = self.db.begin().await?;

        let record = self.repository.get_account(&mut tx, account).await?;

        let orders = self
            .orders_repository
            .get_orders(&mut tx, &record.order_history)
            .await?;

        let orders = self.items_repository.attach_items(&mut tx, orders).await?;

        tx.commit().await?;

        let mut by_uuid: FxHashMap<_, _> = orders
            .into_iter()
            .map(|order| (order.uuid, order))
            .collect();

        Ok(record
            .order_history
            .iter()
            .filter_map(|uuid| by_uuid.remove(uuid))
            .collect())
    }
}

#[automock]
#[async_trait]
pub trait AccountsService: Send + Sync {
    /// Creates an account and issues its API token.
    async fn register_account(
        &self,
        account: NewAccount,
    ) -> Result<RegisteredAccount, AccountsServiceError>;

    /// Retrieve a single account.
    async fn get_account(&self, account: AccountUuid) -> Result<AccountRecord, AccountsServiceError>;

    /// Lists every account, newest first.
    async fn list_accounts(
        &self,
        page: PageRequest,
    ) -> Result<Page<AccountRecord>, AccountsServiceError>;

    /// Retrieve a single account on behalf of `viewer`, who must be the account
    /// itself or an admin.
    async fn view_account(
        &self,
        viewer: Principal,
        account: AccountUuid,
    ) -> Result<AccountRecord, AccountsServiceError>;

    /// Changes the username and/or email. Only the account itself and admins may.
    async fn update_account(
        &self,
        viewer: Principal,
        account: AccountUuid,
        update: AccountUpdate,
    ) -> Result<AccountRecord, AccountsServiceError>;

    /// Removes an account that has never placed an order.
    ///
    /// Accounts with orders are kept so the orders stay attributable and
    /// [`AccountsServiceError::HasOrders`] is returned.
    async fn delete_account(
        &self,
        viewer: Principal,
        account: AccountUuid,
    ) -> Result<(), AccountsServiceError>;

    /// Orders referenced by the account's history, oldest first.
    ///
    /// Only the account itself and admins may read it.
    async fn order_history(
        &self,
        viewer: Principal,
        account: AccountUuid,
    ) -> Result<Vec<OrderRecord>, AccountsServiceError>;
}
