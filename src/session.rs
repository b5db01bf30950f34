//! The session proxy.
//!
//! A [`Session`] owns the credentials of the one user this proxy serves and
//! runs every operation the HTTP layer exposes. It is created empty at start
//! up, becomes authorized once a code has been exchanged, and stays that way
//! until the process exits. There is no way back to unauthorized and no
//! persistence.
//!
//! The token pair sits behind a [`RwLock`], which keeps individual reads and
//! writes whole but does not serialize operations: two overlapping
//! authorizations or refreshes race and the last writer wins. The proxy is
//! meant for a single user, so that is accepted.

use reqwest::Url;
use tokio::sync::RwLock;

use crate::{
    config::RefreshPolicy,
    spotify::{SpotifyClient, SpotifyError, auth::SCOPES},
    success,
    types::{
        Actions, FollowedArtist, NowPlaying, Snapshot, TOKEN_EXPIRY_MARGIN, Token, TopTrack, Track,
    },
    warning,
};

pub const TOP_TRACKS_LIMIT: u32 = 10;
pub const FOLLOWED_ARTISTS_LIMIT: u32 = 50;

#[derive(Debug)]
pub struct Session {
    client: SpotifyClient,
    policy: RefreshPolicy,
    token: RwLock<Option<Token>>,
}

impl Session {
    pub fn new(client: SpotifyClient, policy: RefreshPolicy) -> Self {
        Session {
            client,
            policy,
            token: RwLock::new(None),
        }
    }

    /// Authorization URL for the fixed scope set. Does not touch the session.
    pub fn begin_authorization(&self) -> Result<Url, SpotifyError> {
        self.client.authorize_url(&SCOPES)
    }

    /// Exchanges `code` and replaces the stored token pair. On failure the
    /// session is left as it was.
    pub async fn complete_authorization(&self, code: &str) -> Result<(), SpotifyError> {
        let token = self.client.exchange_code(code).await?;
        *self.token.write().await = Some(token);
        success!("Authorized with Spotify.");
        Ok(())
    }

    /// Obtains a fresh access token with the stored refresh token.
    ///
    /// With [`RefreshPolicy::Always`] this asks the accounts service every
    /// time; with [`RefreshPolicy::OnExpiry`] only when the current token is
    /// within [`TOKEN_EXPIRY_MARGIN`] seconds of expiring. Failures are logged
    /// and otherwise ignored: the call that follows uses whatever token is
    /// stored and reports the provider's rejection itself.
    pub async fn refresh_if_needed(&self) {
        let current = self.token.read().await.clone();
        let Some(current) = current else {
            warning!("Cannot refresh access token: not authorized yet.");
            return;
        };

        if self.policy == RefreshPolicy::OnExpiry && !current.is_expired(TOKEN_EXPIRY_MARGIN) {
            return;
        }

        match self.client.refresh_token(&current.refresh_token).await {
            Ok(token) => *self.token.write().await = Some(token),
            Err(e) => warning!("Refreshing access token failed: {}", e),
        }
    }

    /// Top tracks, now playing and followed artists, read concurrently.
    /// Fails as a whole if any of the three reads fails.
    pub async fn snapshot(&self) -> Result<Snapshot, SpotifyError> {
        let token = self.access_token().await?;

        let (top_tracks, playing, followed) = tokio::try_join!(
            self.client.top_tracks(&token, TOP_TRACKS_LIMIT),
            self.client.currently_playing(&token),
            self.client.followed_artists(&token, FOLLOWED_ARTISTS_LIMIT),
        )?;

        Ok(Snapshot {
            top_tracks: top_tracks
                .into_iter()
                .take(TOP_TRACKS_LIMIT as usize)
                .map(TopTrack::from)
                .collect(),
            now_playing: NowPlaying::from_playing(playing),
            followed_artists: followed
                .into_iter()
                .take(FOLLOWED_ARTISTS_LIMIT as usize)
                .map(FollowedArtist::from)
                .collect(),
            actions: Actions::default(),
        })
    }

    pub async fn pause(&self) -> Result<(), SpotifyError> {
        let token = self.access_token().await?;
        self.client.pause(&token).await
    }

    /// Resolves `track_id` and plays that track alone. Returns the resolved
    /// track so the caller can report its name.
    pub async fn play_track(&self, track_id: &str) -> Result<Track, SpotifyError> {
        let token = self.access_token().await?;
        let track = self.client.track(&token, track_id).await?;
        self.client.play(&token, vec![track.uri.clone()]).await?;
        Ok(track)
    }

    pub async fn is_authorized(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// A copy of the stored token pair, if any.
    pub async fn token(&self) -> Option<Token> {
        self.token.read().await.clone()
    }

    async fn access_token(&self) -> Result<String, SpotifyError> {
        self.refresh_if_needed().await;
        self.token
            .read()
            .await
            .as_ref()
            .map(|t| t.access_token.clone())
            .ok_or(SpotifyError::NotAuthorized)
    }
}
