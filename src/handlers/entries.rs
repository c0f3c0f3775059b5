//! Entry handlers. Entries are addressed through their sheet id; the caller must hold a valid
//! token but sheet ownership is not checked here.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

use super::sheets::NAME_MAX;
use super::{parse_id, NameBody};
use crate::error::AppError;
use crate::extractors::{AuthUser, Json};
use crate::response::{success_empty, success_many, success_one};
use crate::service::validation::require_length;
use crate::service::{EntryField, FieldUpdate, UpdateBody};
use crate::state::AppState;

pub async fn list_entries(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(sheet_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let sheet_id = parse_id(&sheet_id)?;
    let entries = state.store.list_entries(sheet_id).await?;
    Ok(success_many(entries))
}

pub async fn get_entry(AuthUser(_): AuthUser, Path(_ids): Path<(String, String)>) -> Result<(), AppError> {
    Err(AppError::Unimplemented("Fetching a single entry"))
}

#[tracing::instrument(skip_all)]
pub async fn create_entry(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(sheet_id): Path<String>,
    Json(body): Json<NameBody>,
) -> Result<impl IntoResponse, AppError> {
    let sheet_id = parse_id(&sheet_id)?;
    require_length("Name", &body.name, 1, NAME_MAX)?;
    // TODO: reject when the sheet is not owned by claims.id once the product decides on 403 vs 404.
    let entry = state.store.insert_entry(sheet_id, &body.name).await?;
    tracing::info!(entry_id = %entry.id, %sheet_id, account_id = %claims.id, "entry created");
    Ok(success_one(entry))
}

#[tracing::instrument(skip_all)]
pub async fn update_entry(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path((sheet_id, entry_id)): Path<(String, String)>,
    Json(body): Json<UpdateBody>,
) -> Result<impl IntoResponse, AppError> {
    let sheet_id = parse_id(&sheet_id)?;
    let entry_id = parse_id(&entry_id)?;
    let update = FieldUpdate::<EntryField>::parse(&body)?;
    let rows = state.store.update_entry_field(entry_id, sheet_id, &update).await?;
    if rows == 0 {
        tracing::debug!(%entry_id, %sheet_id, "entry update matched no rows");
    }
    Ok(success_empty())
}

#[tracing::instrument(skip_all)]
pub async fn delete_entry(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path((sheet_id, entry_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let sheet_id = parse_id(&sheet_id)?;
    let entry_id = parse_id(&entry_id)?;
    let rows = state.store.delete_entry(entry_id, sheet_id).await?;
    tracing::info!(%entry_id, %sheet_id, rows, "entry deleted");
    Ok(success_empty())
}
