//! Extract and verify the bearer token from the `Authorization` header.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::auth::{extract_token, Claims, TokenService};
use crate::error::{AppError, TokenError};

/// Claims of the caller's verified token. Rejects with a token error when the header is absent
/// or the token does not verify.
#[derive(Clone, Debug)]
pub struct AuthUser(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    Arc<TokenService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::trim);
        let token = extract_token(header).ok_or(TokenError::Missing)?;
        let claims = Arc::<TokenService>::from_ref(state).verify(token)?;
        Ok(AuthUser(claims))
    }
}
