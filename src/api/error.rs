use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::{spotify::SpotifyError, warning};

/// Failure of a proxy route. Every variant is answered the same way:
/// `500` with `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Spotify(#[from] SpotifyError),
    #[error("Authorization failed: {0}")]
    Authorization(String),
    #[error("Missing authorization code")]
    MissingCode,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        warning!("Request failed: {}", message);

        let body = Json(json!({
            "error": message
        }));

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
