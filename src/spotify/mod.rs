//! # Spotify Integration Module
//!
//! This module provides the thin interface to the Spotify Web API that the proxy
//! relays: the OAuth authorization-code flow against the accounts service, the
//! three user reads behind the snapshot, and two playback controls.
//!
//! ## Architecture
//!
//! The module follows a feature-based organization where each submodule handles a
//! specific domain of Spotify API functionality:
//!
//! ```text
//! Session Proxy (crate::session)
//!          ↓
//! Spotify Integration Layer
//!     ├── Authentication (authorization code, refresh)
//!     ├── Artist Operations (followed artists)
//!     ├── Track Operations (top tracks, track lookup)
//!     └── Player Operations (now playing, pause, play)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Request Policy
//!
//! Every call is a single attempt. There is no retry, no backoff and no timeout
//! beyond whatever the transport applies. Non-2xx responses become
//! [`SpotifyError::Api`] carrying the provider's own message, extracted from either
//! the Web API error shape (`{"error": {"status", "message"}}`) or the accounts
//! service shape (`{"error", "error_description"}`).
//!
//! ## API Coverage
//!
//! - `POST /api/token` - Token exchange and refresh operations
//! - `GET /me/top/tracks` - User's top tracks by affinity
//! - `GET /me/player/currently-playing` - Currently playing item
//! - `GET /me/following` - User's followed artists
//! - `GET /tracks/{id}` - Track metadata
//! - `PUT /me/player/pause` - Pause playback
//! - `PUT /me/player/play` - Start playback of given URIs

use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::{
    config::Config,
    types::{ApiErrorBody, AuthErrorBody},
};

pub mod artists;
pub mod auth;
pub mod player;
pub mod tracks;

#[derive(Debug, Error)]
pub enum SpotifyError {
    #[error("Not authorized. Log in via /spotify/auth first.")]
    NotAuthorized,
    #[error("{message}")]
    Api { status: StatusCode, message: String },
    #[error("Request to Spotify failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Unexpected response from Spotify: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Invalid Spotify URL: {0}")]
    InvalidUrl(String),
}

impl SpotifyError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            SpotifyError::Api { status, .. } => Some(*status),
            SpotifyError::Http(err) => err.status(),
            _ => None,
        }
    }
}

/// Client for the accounts service and the Web API of one registered app.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    api_url: String,
    auth_url: String,
    token_url: String,
}

impl SpotifyClient {
    pub fn new(config: &Config) -> Self {
        SpotifyClient {
            http: Client::new(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
            api_url: config.api_url.clone(),
            auth_url: config.auth_url.clone(),
            token_url: config.token_url.clone(),
        }
    }

    /// Builds a Web API URL from path segments. Segments are percent-encoded,
    /// so ids coming from request paths cannot escape their segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, SpotifyError> {
        let mut url =
            Url::parse(&self.api_url).map_err(|e| SpotifyError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| SpotifyError::InvalidUrl(self.api_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        token: &str,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T, SpotifyError> {
        let response = self
            .http
            .get(self.endpoint(segments)?)
            .query(query)
            .bearer_auth(token)
            .send()
            .await?;

        decode(check(response).await?).await
    }
}

/// Passes 2xx responses through and turns everything else into
/// [`SpotifyError::Api`].
pub(crate) async fn check(response: Response) -> Result<Response, SpotifyError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(SpotifyError::Api {
        status,
        message: error_message(status, &body),
    })
}

pub(crate) async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, SpotifyError> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(api) = serde_json::from_str::<ApiErrorBody>(body) {
        return api.error.message;
    }
    if let Ok(auth) = serde_json::from_str::<AuthErrorBody>(body) {
        return match auth.error_description {
            Some(description) if !description.is_empty() => {
                format!("{}: {}", auth.error, description)
            }
            _ => auth.error,
        };
    }

    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| status.to_string())
    } else {
        body.to_string()
    }
}
