//! Account handlers: register, login, single-field update, delete, password change.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;

use crate::auth::password;
use crate::error::AppError;
use crate::extractors::{AuthUser, Json};
use crate::response::{success_empty, success_token};
use crate::service::validation::{require_email, require_length, require_password};
use crate::service::{AccountField, FieldUpdate, UpdateBody};
use crate::state::AppState;
use crate::store::NewAccount;

const NAME_MAX: usize = 50;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PasswordChangeRequest {
    pub old_password: String,
    pub new_password: String,
}

/// POST /auth: create an account and return a token.
#[tracing::instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_length("First name", &req.first_name, 1, NAME_MAX)?;
    require_length("Last name", &req.last_name, 1, NAME_MAX)?;
    require_email(&req.email)?;
    require_password(&req.password)?;

    let password_hash = password::hash(req.password).await?;
    let account = state
        .store
        .insert_account(NewAccount {
            name: req.first_name,
            surname: req.last_name,
            email: req.email,
            password_hash,
        })
        .await?;
    let token = state.tokens.issue(account.id, &account.email)?;
    tracing::info!(account_id = %account.id, "account registered");
    Ok(success_token(StatusCode::CREATED, token))
}

/// GET /auth: exchange email and password for a token.
#[tracing::instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let account = state
        .store
        .account_by_email(&req.email)
        .await?
        .ok_or_else(|| AppError::Auth("Email does not exist.".into()))?;

    if !password::verify(req.password, account.password.clone()).await? {
        return Err(AppError::Auth("Wrong password.".into()));
    }

    let token = state.tokens.issue(account.id, &account.email)?;
    tracing::info!(account_id = %account.id, "login");
    Ok(success_token(StatusCode::OK, token))
}

/// PATCH /auth: `{col, val}` on the caller's account.
#[tracing::instrument(skip_all)]
pub async fn update_account(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(body): Json<UpdateBody>,
) -> Result<impl IntoResponse, AppError> {
    let update = FieldUpdate::<AccountField>::parse(&body)?;
    let rows = state.store.update_account_field(claims.id, &update).await?;
    if rows == 0 {
        tracing::debug!(account_id = %claims.id, "account update matched no rows");
    }
    Ok(success_empty())
}

/// DELETE /auth: remove the caller's account along with its sheets.
#[tracing::instrument(skip_all)]
pub async fn delete_account(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let rows = state.store.delete_account(claims.id).await?;
    tracing::info!(account_id = %claims.id, rows, "account deleted");
    Ok(success_empty())
}

/// POST /auth/pass-change
#[tracing::instrument(skip_all)]
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(req): Json<PasswordChangeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let account = state
        .store
        .account_by_id(claims.id)
        .await?
        .ok_or_else(|| AppError::Auth("Account does not exist.".into()))?;

    if !password::verify(req.old_password, account.password).await? {
        return Err(AppError::Auth("Wrong password.".into()));
    }
    require_password(&req.new_password)?;

    let password_hash = password::hash(req.new_password).await?;
    state.store.update_account_password(claims.id, &password_hash).await?;
    tracing::info!(account_id = %claims.id, "password changed");
    Ok(success_empty())
}
