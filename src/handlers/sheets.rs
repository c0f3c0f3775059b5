//! Sheet handlers. Every query is scoped to the caller's account.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

use super::{parse_id, NameBody};
use crate::error::AppError;
use crate::extractors::{AuthUser, Json};
use crate::response::{success_empty, success_many, success_one};
use crate::service::validation::require_length;
use crate::service::{FieldUpdate, SheetField, UpdateBody};
use crate::state::AppState;

pub(crate) const NAME_MAX: usize = 100;

pub async fn list_sheets(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let sheets = state.store.list_sheets(claims.id).await?;
    Ok(success_many(sheets))
}

pub async fn get_sheet(AuthUser(_): AuthUser, Path(_sheet_id): Path<String>) -> Result<(), AppError> {
    Err(AppError::Unimplemented("Fetching a single sheet"))
}

#[tracing::instrument(skip_all)]
pub async fn create_sheet(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(body): Json<NameBody>,
) -> Result<impl IntoResponse, AppError> {
    require_length("Name", &body.name, 1, NAME_MAX)?;
    let sheet = state.store.insert_sheet(claims.id, &body.name).await?;
    tracing::info!(sheet_id = %sheet.id, account_id = %claims.id, "sheet created");
    Ok(success_one(sheet))
}

#[tracing::instrument(skip_all)]
pub async fn update_sheet(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(sheet_id): Path<String>,
    Json(body): Json<UpdateBody>,
) -> Result<impl IntoResponse, AppError> {
    let sheet_id = parse_id(&sheet_id)?;
    let update = FieldUpdate::<SheetField>::parse(&body)?;
    let rows = state.store.update_sheet_field(sheet_id, claims.id, &update).await?;
    if rows == 0 {
        tracing::debug!(%sheet_id, account_id = %claims.id, "sheet update matched no rows");
    }
    Ok(success_empty())
}

#[tracing::instrument(skip_all)]
pub async fn delete_sheet(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(sheet_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let sheet_id = parse_id(&sheet_id)?;
    let rows = state.store.delete_sheet(sheet_id, claims.id).await?;
    tracing::info!(%sheet_id, account_id = %claims.id, rows, "sheet deleted");
    Ok(success_empty())
}
