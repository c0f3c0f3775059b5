//! [`Store`] over a PostgreSQL pool. Each call checks out one pooled connection for its statement;
//! the connection goes back to the pool when it drops, on success and error alike.

use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use super::{Account, Entry, NewAccount, Sheet, Store};
use crate::error::StoreError;
use crate::service::{AccountField, EntryField, FieldUpdate, FieldValue, SheetField, UpdatableField};
use crate::sql::{self, ACCOUNTS, ACCOUNT_COLUMNS, ENTRIES, ENTRY_COLUMNS, SHEETS, SHEET_COLUMNS};

#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }

    async fn acquire(&self) -> Result<PoolConnection<Postgres>, StoreError> {
        Ok(self.pool.acquire().await?)
    }

    async fn account_where(&self, key: &str, value: AccountKey<'_>) -> Result<Option<Account>, StoreError> {
        let q = format!("{} LIMIT 1", sql::select_where(ACCOUNTS, ACCOUNT_COLUMNS, key));
        tracing::debug!(sql = %q, "query");
        let mut conn = self.acquire().await?;
        let query = sqlx::query_as::<_, Account>(&q);
        let query = match value {
            AccountKey::Id(id) => query.bind(id),
            AccountKey::Email(email) => query.bind(email),
        };
        Ok(query.fetch_optional(&mut *conn).await?)
    }

    async fn update_field<F: UpdatableField>(
        &self,
        table: &str,
        update: &FieldUpdate<F>,
        id: Uuid,
        owner: Option<(&str, Uuid)>,
    ) -> Result<u64, StoreError> {
        let q = sql::update_field(table, update.field.column(), owner.map(|(column, _)| column));
        tracing::debug!(sql = %q, id = %id, "query");
        let mut conn = self.acquire().await?;
        let query = sqlx::query(&q);
        let query = match &update.value {
            FieldValue::Text(s) => query.bind(s.as_str()),
            FieldValue::Int(n) => query.bind(*n),
        };
        let mut query = query.bind(id);
        if let Some((_, owner_id)) = owner {
            query = query.bind(owner_id);
        }
        let result = query.execute(&mut *conn).await?;
        Ok(result.rows_affected())
    }

    async fn delete_row(&self, table: &str, id: Uuid, owner: Option<(&str, Uuid)>) -> Result<u64, StoreError> {
        let q = sql::delete(table, owner.map(|(column, _)| column));
        tracing::debug!(sql = %q, id = %id, "query");
        let mut conn = self.acquire().await?;
        let mut query = sqlx::query(&q).bind(id);
        if let Some((_, owner_id)) = owner {
            query = query.bind(owner_id);
        }
        let result = query.execute(&mut *conn).await?;
        Ok(result.rows_affected())
    }
}

enum AccountKey<'a> {
    Id(Uuid),
    Email(&'a str),
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.acquire().await?;
        sqlx::query("SELECT 1").execute(&mut *conn).await?;
        Ok(())
    }

    async fn insert_account(&self, account: NewAccount) -> Result<Account, StoreError> {
        let q = sql::insert(ACCOUNTS, &["name", "surname", "email", "password"], ACCOUNT_COLUMNS);
        tracing::debug!(sql = %q, "query");
        let mut conn = self.acquire().await?;
        let row = sqlx::query_as::<_, Account>(&q)
            .bind(&account.name)
            .bind(&account.surname)
            .bind(&account.email)
            .bind(&account.password_hash)
            .fetch_one(&mut *conn)
            .await?;
        Ok(row)
    }

    async fn account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        self.account_where("email", AccountKey::Email(email)).await
    }

    async fn account_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        self.account_where("id", AccountKey::Id(id)).await
    }

    async fn update_account_field(&self, id: Uuid, update: &FieldUpdate<AccountField>) -> Result<u64, StoreError> {
        self.update_field(ACCOUNTS, update, id, None).await
    }

    async fn update_account_password(&self, id: Uuid, password_hash: &str) -> Result<u64, StoreError> {
        let q = sql::update_field(ACCOUNTS, "password", None);
        tracing::debug!(sql = %q, id = %id, "query");
        let mut conn = self.acquire().await?;
        let result = sqlx::query(&q)
            .bind(password_hash)
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_account(&self, id: Uuid) -> Result<u64, StoreError> {
        self.delete_row(ACCOUNTS, id, None).await
    }

    async fn list_sheets(&self, user_id: Uuid) -> Result<Vec<Sheet>, StoreError> {
        let q = sql::select_where(SHEETS, SHEET_COLUMNS, "user_id");
        tracing::debug!(sql = %q, "query");
        let mut conn = self.acquire().await?;
        let rows = sqlx::query_as::<_, Sheet>(&q)
            .bind(user_id)
            .fetch_all(&mut *conn)
            .await?;
        Ok(rows)
    }

    async fn insert_sheet(&self, user_id: Uuid, name: &str) -> Result<Sheet, StoreError> {
        let q = sql::insert(SHEETS, &["user_id", "name"], SHEET_COLUMNS);
        tracing::debug!(sql = %q, "query");
        let mut conn = self.acquire().await?;
        let row = sqlx::query_as::<_, Sheet>(&q)
            .bind(user_id)
            .bind(name)
            .fetch_one(&mut *conn)
            .await?;
        Ok(row)
    }

    async fn update_sheet_field(
        &self,
        id: Uuid,
        user_id: Uuid,
        update: &FieldUpdate<SheetField>,
    ) -> Result<u64, StoreError> {
        self.update_field(SHEETS, update, id, Some(("user_id", user_id))).await
    }

    async fn delete_sheet(&self, id: Uuid, user_id: Uuid) -> Result<u64, StoreError> {
        self.delete_row(SHEETS, id, Some(("user_id", user_id))).await
    }

    async fn list_entries(&self, sheet_id: Uuid) -> Result<Vec<Entry>, StoreError> {
        let q = sql::select_where(ENTRIES, ENTRY_COLUMNS, "sheet_id");
        tracing::debug!(sql = %q, "query");
        let mut conn = self.acquire().await?;
        let rows = sqlx::query_as::<_, Entry>(&q)
            .bind(sheet_id)
            .fetch_all(&mut *conn)
            .await?;
        Ok(rows)
    }

    async fn insert_entry(&self, sheet_id: Uuid, name: &str) -> Result<Entry, StoreError> {
        let q = sql::insert(ENTRIES, &["sheet_id", "name"], ENTRY_COLUMNS);
        tracing::debug!(sql = %q, "query");
        let mut conn = self.acquire().await?;
        let row = sqlx::query_as::<_, Entry>(&q)
            .bind(sheet_id)
            .bind(name)
            .fetch_one(&mut *conn)
            .await?;
        Ok(row)
    }

    async fn update_entry_field(
        &self,
        id: Uuid,
        sheet_id: Uuid,
        update: &FieldUpdate<EntryField>,
    ) -> Result<u64, StoreError> {
        self.update_field(ENTRIES, update, id, Some(("sheet_id", sheet_id))).await
    }

    async fn delete_entry(&self, id: Uuid, sheet_id: Uuid) -> Result<u64, StoreError> {
        self.delete_row(ENTRIES, id, Some(("sheet_id", sheet_id))).await
    }
}
