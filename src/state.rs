//! Shared application state for all routes.

use std::sync::Arc;

use axum::extract::FromRef;

use crate::auth::TokenService;
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, tokens: TokenService) -> Self {
        AppState {
            store,
            tokens: Arc::new(tokens),
        }
    }
}

impl FromRef<AppState> for Arc<TokenService> {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}
