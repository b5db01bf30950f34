use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, Query},
    http::{StatusCode, header::LOCATION},
    response::IntoResponse,
};
use serde::Deserialize;

use super::ApiError;
use crate::{
    info,
    session::Session,
    types::{MessageResponse, Snapshot},
};

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
}

/// `GET /spotify/auth`: redirects to the Spotify consent page.
pub async fn authorize(
    Extension(session): Extension<Arc<Session>>,
) -> Result<impl IntoResponse, ApiError> {
    let url = session.begin_authorization()?;
    Ok((StatusCode::FOUND, [(LOCATION, url.to_string())]))
}

/// `GET /spotify/callback?code=`: exchanges the code for the token pair.
pub async fn callback(
    Query(params): Query<CallbackParams>,
    Extension(session): Extension<Arc<Session>>,
) -> Result<Json<MessageResponse>, ApiError> {
    if let Some(error) = params.error {
        return Err(ApiError::Authorization(error));
    }
    let code = params.code.ok_or(ApiError::MissingCode)?;

    session.complete_authorization(&code).await?;
    Ok(Json(MessageResponse::new("Login successful! You can now use /spotify.")))
}

/// `GET /spotify`: top tracks, now playing and followed artists.
pub async fn snapshot(
    Extension(session): Extension<Arc<Session>>,
) -> Result<Json<Snapshot>, ApiError> {
    Ok(Json(session.snapshot().await?))
}

/// `GET /spotify/pause`
pub async fn pause(
    Extension(session): Extension<Arc<Session>>,
) -> Result<Json<MessageResponse>, ApiError> {
    session.pause().await?;
    info!("Playback paused.");
    Ok(Json(MessageResponse::new("Playback paused.")))
}

/// `PUT /spotify/play/{track_id}`
pub async fn play(
    Path(track_id): Path<String>,
    Extension(session): Extension<Arc<Session>>,
) -> Result<Json<MessageResponse>, ApiError> {
    let track = session.play_track(&track_id).await?;
    info!("Playing {} ({})", track.name, track.uri);
    Ok(Json(MessageResponse::new(format!("Playing: {}", track.name))))
}
