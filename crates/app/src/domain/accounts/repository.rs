//! Accounts Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{
    FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar,
};
use uuid::Uuid;

use crate::domain::{
    accounts::{
        data::{AccountUpdate, NewAccount},
        records::{AccountRecord, AccountUuid},
    },
    orders::records::OrderUuid,
    pagination::{PageRequest, sql_limit_offset},
    products::repository::count_from_db,
};

const CREATE_ACCOUNT_SQL: &str = include_str!("sql/create_account.sql");
const GET_ACCOUNT_SQL: &str = include_str!("sql/get_account.sql");
const LIST_ACCOUNTS_SQL: &str = include_str!("sql/list_accounts.sql");
const COUNT_ACCOUNTS_SQL: &str = include_str!("sql/count_accounts.sql");
const UPDATE_ACCOUNT_SQL: &str = include_str!("sql/update_account.sql");
const DELETE_ACCOUNT_SQL: &str = include_str!("sql/delete_account.sql");
const APPEND_ORDER_HISTORY_SQL: &str = include_str!("sql/append_order_history.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgAccountsRepository;

impl PgAccountsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_account(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: &NewAccount,
        credential_hash: &str,
    ) -> Result<AccountRecord, sqlx::Error> {
        query_as::<Postgres, AccountRecord>(CREATE_ACCOUNT_SQL)
            .bind(account.uuid.into_uuid())
            .bind(&account.username)
            .bind(&account.email)
            .bind(credential_hash)
            .bind(account.is_admin)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_account(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: AccountUuid,
    ) -> Result<AccountRecord, sqlx::Error> {
        query_as::<Postgres, AccountRecord>(GET_ACCOUNT_SQL)
            .bind(account.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_accounts(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        page: PageRequest,
    ) -> Result<Vec<AccountRecord>, sqlx::Error> {
        let (limit, offset) = sql_limit_offset(page);

        query_as::<Postgres, AccountRecord>(LIST_ACCOUNTS_SQL)
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn count_accounts(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<u64, sqlx::Error> {
        let total: i64 = query_scalar(COUNT_ACCOUNTS_SQL)
            .fetch_one(&mut **tx)
            .await?;

        count_from_db(total)
    }

    /// Applies the fields set in `update`; unset fields keep their value.
    pub(crate) async fn update_account(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: AccountUuid,
        update: &AccountUpdate,
    ) -> Result<AccountRecord, sqlx::Error> {
        query_as::<Postgres, AccountRecord>(UPDATE_ACCOUNT_SQL)
            .bind(account.into_uuid())
            .bind(update.username.as_deref())
            .bind(update.email.as_deref())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_account(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: AccountUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_ACCOUNT_SQL)
            .bind(account.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn append_order_history(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: AccountUuid,
        order: OrderUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(APPEND_ORDER_HISTORY_SQL)
            .bind(account.into_uuid())
            .bind(order.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for AccountRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let order_history: Vec<Uuid> = row.try_get("order_history")?;

        Ok(Self {
            uuid: AccountUuid::from_uuid(row.try_get("uuid")?),
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            is_admin: row.try_get("is_admin")?,
            order_history: order_history.into_iter().map(OrderUuid::from_uuid).collect(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
