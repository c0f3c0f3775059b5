//! Standard response envelope helpers: `{success, data?, token?, error?}`.

use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn failure(message: String) -> Self {
        Envelope {
            success: false,
            data: None,
            token: None,
            error: Some(message),
        }
    }
}

pub type Reply<T> = (StatusCode, Json<Envelope<T>>);

fn with_data<T: Serialize>(status: StatusCode, data: T) -> Reply<T> {
    (
        status,
        Json(Envelope {
            success: true,
            data: Some(data),
            token: None,
            error: None,
        }),
    )
}

/// 201 with the created resource.
pub fn success_one<T: Serialize>(data: T) -> Reply<T> {
    with_data(StatusCode::CREATED, data)
}

pub fn success_many<T: Serialize>(data: Vec<T>) -> Reply<Vec<T>> {
    with_data(StatusCode::OK, data)
}

/// `{success: true, token}` with the given status (201 on register, 200 on login).
pub fn success_token(status: StatusCode, token: String) -> Reply<()> {
    (
        status,
        Json(Envelope {
            success: true,
            data: None,
            token: Some(token),
            error: None,
        }),
    )
}

/// Bare `{success: true}`.
pub fn success_empty() -> Reply<()> {
    (
        StatusCode::OK,
        Json(Envelope {
            success: true,
            data: None,
            token: None,
            error: None,
        }),
    )
}
