//! # API Module
//!
//! HTTP endpoints of the proxy. Each handler takes the shared
//! [`Session`](crate::session::Session) from the request extensions, runs one
//! session operation and reshapes the result into JSON.
//!
//! ## Endpoints
//!
//! ### Authentication
//!
//! - [`authorize`] - `GET /spotify/auth`, 302 redirect to the Spotify consent page
//!   asking for the four scopes the proxy needs.
//! - [`callback`] - `GET /spotify/callback?code=`, completes the authorization-code
//!   exchange and stores the token pair in the session.
//!
//! ### Spotify
//!
//! - [`snapshot`] - `GET /spotify`, top tracks, now playing and followed artists.
//! - [`pause`] - `GET /spotify/pause`, pauses playback on the active device.
//! - [`play`] - `PUT /spotify/play/{track_id}`, plays one track by id.
//!
//! ### Monitoring
//!
//! - [`health`] - `GET /health`, status, version and whether a user is authorized.
//!
//! ## Errors
//!
//! Every failure, whether it came from the network, the accounts service or the
//! Web API, is answered with HTTP 500 and `{"error": "<message>"}`. See
//! [`ApiError`].

mod error;
mod health;
mod spotify;

pub use error::ApiError;
pub use health::health;
pub use spotify::{CallbackParams, authorize, callback, pause, play, snapshot};
