//! HTTP handlers for accounts, sheets, and entries.

pub mod accounts;
pub mod entries;
pub mod sheets;

use crate::error::AppError;
use uuid::Uuid;

fn parse_id(id_str: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id_str).map_err(|_| AppError::Validation("Invalid id.".into()))
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct NameBody {
    pub name: String,
}
