//! Persistence gateway: row types and the [`Store`] trait handlers depend on.

mod memory;
mod postgres;
mod schema;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use schema::{ensure_database_exists, ensure_tables};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::StoreError;
use crate::service::{AccountField, EntryField, FieldUpdate, SheetField};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub surname: String,
    pub email: String,
    /// Argon2 PHC hash.
    #[serde(skip)]
    pub password: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Sheet {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: Uuid,
    pub sheet_id: Uuid,
    pub name: String,
    pub mark_count: i64,
    pub last_mark: i64,
    pub created_at: DateTime<Utc>,
}

/// Statements the handlers issue. Update and delete methods return the number of rows affected;
/// ownership-scoped ones match nothing when the owner key is wrong.
#[async_trait]
pub trait Store: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;

    async fn insert_account(&self, account: NewAccount) -> Result<Account, StoreError>;
    async fn account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;
    async fn account_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError>;
    async fn update_account_field(&self, id: Uuid, update: &FieldUpdate<AccountField>) -> Result<u64, StoreError>;
    async fn update_account_password(&self, id: Uuid, password_hash: &str) -> Result<u64, StoreError>;
    async fn delete_account(&self, id: Uuid) -> Result<u64, StoreError>;

    async fn list_sheets(&self, user_id: Uuid) -> Result<Vec<Sheet>, StoreError>;
    async fn insert_sheet(&self, user_id: Uuid, name: &str) -> Result<Sheet, StoreError>;
    async fn update_sheet_field(
        &self,
        id: Uuid,
        user_id: Uuid,
        update: &FieldUpdate<SheetField>,
    ) -> Result<u64, StoreError>;
    async fn delete_sheet(&self, id: Uuid, user_id: Uuid) -> Result<u64, StoreError>;

    async fn list_entries(&self, sheet_id: Uuid) -> Result<Vec<Entry>, StoreError>;
    async fn insert_entry(&self, sheet_id: Uuid, name: &str) -> Result<Entry, StoreError>;
    async fn update_entry_field(
        &self,
        id: Uuid,
        sheet_id: Uuid,
        update: &FieldUpdate<EntryField>,
    ) -> Result<u64, StoreError>;
    async fn delete_entry(&self, id: Uuid, sheet_id: Uuid) -> Result<u64, StoreError>;
}
