//! In-process [`Store`] with the same constraints as the PostgreSQL schema: unique account email,
//! owner foreign keys, and cascading deletes. Used by tests and for running without a database.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{Account, Entry, NewAccount, Sheet, Store};
use crate::error::{StoreError, ACCOUNT_EMAIL_CONSTRAINT};
use crate::service::{AccountField, EntryField, FieldUpdate, FieldValue, SheetField};

#[derive(Default, Debug)]
struct Tables {
    accounts: Vec<Account>,
    sheets: Vec<Sheet>,
    entries: Vec<Entry>,
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn insert_account(&self, account: NewAccount) -> Result<Account, StoreError> {
        let mut tables = self.lock();
        if tables.accounts.iter().any(|a| a.email == account.email) {
            return Err(StoreError::UniqueViolation {
                constraint: ACCOUNT_EMAIL_CONSTRAINT.into(),
            });
        }
        let row = Account {
            id: Uuid::new_v4(),
            name: account.name,
            surname: account.surname,
            email: account.email,
            password: account.password_hash,
            created_at: Utc::now(),
        };
        tables.accounts.push(row.clone());
        Ok(row)
    }

    async fn account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.lock().accounts.iter().find(|a| a.email == email).cloned())
    }

    async fn account_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        Ok(self.lock().accounts.iter().find(|a| a.id == id).cloned())
    }

    async fn update_account_field(&self, id: Uuid, update: &FieldUpdate<AccountField>) -> Result<u64, StoreError> {
        let mut tables = self.lock();
        let Some(account) = tables.accounts.iter_mut().find(|a| a.id == id) else {
            return Ok(0);
        };
        match (update.field, &update.value) {
            (AccountField::Name, FieldValue::Text(s)) => account.name = s.clone(),
            (AccountField::Surname, FieldValue::Text(s)) => account.surname = s.clone(),
            _ => return Ok(0),
        }
        Ok(1)
    }

    async fn update_account_password(&self, id: Uuid, password_hash: &str) -> Result<u64, StoreError> {
        let mut tables = self.lock();
        match tables.accounts.iter_mut().find(|a| a.id == id) {
            Some(account) => {
                account.password = password_hash.to_string();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_account(&self, id: Uuid) -> Result<u64, StoreError> {
        let mut tables = self.lock();
        let before = tables.accounts.len();
        tables.accounts.retain(|a| a.id != id);
        let removed = (before - tables.accounts.len()) as u64;
        if removed > 0 {
            let owned: Vec<Uuid> = tables.sheets.iter().filter(|s| s.user_id == id).map(|s| s.id).collect();
            tables.sheets.retain(|s| s.user_id != id);
            tables.entries.retain(|e| !owned.contains(&e.sheet_id));
        }
        Ok(removed)
    }

    async fn list_sheets(&self, user_id: Uuid) -> Result<Vec<Sheet>, StoreError> {
        Ok(self.lock().sheets.iter().filter(|s| s.user_id == user_id).cloned().collect())
    }

    async fn insert_sheet(&self, user_id: Uuid, name: &str) -> Result<Sheet, StoreError> {
        let mut tables = self.lock();
        if !tables.accounts.iter().any(|a| a.id == user_id) {
            return Err(StoreError::ForeignKeyViolation {
                constraint: "sheets_user_id_fkey".into(),
            });
        }
        let row = Sheet {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_string(),
            created_at: Utc::now(),
        };
        tables.sheets.push(row.clone());
        Ok(row)
    }

    async fn update_sheet_field(
        &self,
        id: Uuid,
        user_id: Uuid,
        update: &FieldUpdate<SheetField>,
    ) -> Result<u64, StoreError> {
        let mut tables = self.lock();
        let Some(sheet) = tables.sheets.iter_mut().find(|s| s.id == id && s.user_id == user_id) else {
            return Ok(0);
        };
        match (update.field, &update.value) {
            (SheetField::Name, FieldValue::Text(s)) => sheet.name = s.clone(),
            _ => return Ok(0),
        }
        Ok(1)
    }

    async fn delete_sheet(&self, id: Uuid, user_id: Uuid) -> Result<u64, StoreError> {
        let mut tables = self.lock();
        let before = tables.sheets.len();
        tables.sheets.retain(|s| !(s.id == id && s.user_id == user_id));
        let removed = (before - tables.sheets.len()) as u64;
        if removed > 0 {
            tables.entries.retain(|e| e.sheet_id != id);
        }
        Ok(removed)
    }

    async fn list_entries(&self, sheet_id: Uuid) -> Result<Vec<Entry>, StoreError> {
        Ok(self.lock().entries.iter().filter(|e| e.sheet_id == sheet_id).cloned().collect())
    }

    async fn insert_entry(&self, sheet_id: Uuid, name: &str) -> Result<Entry, StoreError> {
        let mut tables = self.lock();
        if !tables.sheets.iter().any(|s| s.id == sheet_id) {
            return Err(StoreError::ForeignKeyViolation {
                constraint: "entries_sheet_id_fkey".into(),
            });
        }
        let row = Entry {
            id: Uuid::new_v4(),
            sheet_id,
            name: name.to_string(),
            mark_count: 0,
            last_mark: 0,
            created_at: Utc::now(),
        };
        tables.entries.push(row.clone());
        Ok(row)
    }

    async fn update_entry_field(
        &self,
        id: Uuid,
        sheet_id: Uuid,
        update: &FieldUpdate<EntryField>,
    ) -> Result<u64, StoreError> {
        let mut tables = self.lock();
        let Some(entry) = tables.entries.iter_mut().find(|e| e.id == id && e.sheet_id == sheet_id) else {
            return Ok(0);
        };
        match (update.field, &update.value) {
            (EntryField::Name, FieldValue::Text(s)) => entry.name = s.clone(),
            (EntryField::MarkCount, FieldValue::Int(n)) => entry.mark_count = *n,
            (EntryField::LastMark, FieldValue::Int(n)) => entry.last_mark = *n,
            _ => return Ok(0),
        }
        Ok(1)
    }

    async fn delete_entry(&self, id: Uuid, sheet_id: Uuid) -> Result<u64, StoreError> {
        let mut tables = self.lock();
        let before = tables.entries.len();
        tables.entries.retain(|e| !(e.id == id && e.sheet_id == sheet_id));
        Ok((before - tables.entries.len()) as u64)
    }
}
