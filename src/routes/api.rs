//! Versioned API routes. Mounted under `/api/v1`.

use crate::handlers::accounts::{change_password, delete_account, login, register, update_account};
use crate::handlers::entries::{create_entry, delete_entry, get_entry, list_entries, update_entry};
use crate::handlers::sheets::{create_sheet, delete_sheet, get_sheet, list_sheets, update_sheet};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn api_routes(state: AppState) -> Router {
    let auth = post(register)
        .get(login)
        .patch(update_account)
        .delete(delete_account);
    let sheets = get(list_sheets).post(create_sheet);
    let entries = get(list_entries).post(create_entry);

    Router::new()
        .route("/auth", auth.clone())
        .route("/auth/", auth)
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/pass-change", post(change_password))
        .route("/sheets", sheets.clone())
        .route("/sheets/", sheets)
        .route(
            "/sheets/:sheet_id",
            get(get_sheet).patch(update_sheet).delete(delete_sheet),
        )
        .route("/sheets/:sheet_id/entries", entries.clone())
        .route("/sheets/:sheet_id/entries/", entries)
        .route(
            "/sheets/:sheet_id/entries/:entry_id",
            get(get_entry).patch(update_entry).delete(delete_entry),
        )
        .with_state(state)
}
