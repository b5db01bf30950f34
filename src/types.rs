use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Seconds before the provider-reported expiry at which a token is treated
/// as expired.
pub const TOKEN_EXPIRY_MARGIN: u64 = 240;

#[derive(Debug, Clone)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

impl Token {
    pub fn is_expired(&self, margin: u64) -> bool {
        let now = Utc::now().timestamp().max(0) as u64;
        now + margin >= self.obtained_at + self.expires_in
    }
}

/// Body returned by the accounts service token endpoint for both the
/// authorization-code and the refresh-token grants.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

impl TokenResponse {
    /// Turns the response into a stored token. A refresh grant may omit the
    /// refresh token, in which case `previous_refresh` is carried over.
    pub fn into_token(self, previous_refresh: Option<&str>) -> Token {
        Token {
            access_token: self.access_token,
            refresh_token: self
                .refresh_token
                .or_else(|| previous_refresh.map(str::to_string))
                .unwrap_or_default(),
            scope: self.scope,
            expires_in: self.expires_in,
            obtained_at: Utc::now().timestamp().max(0) as u64,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleArtist {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: Option<String>,
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub artists: Vec<SimpleArtist>,
}

impl Track {
    pub fn primary_artist(&self) -> String {
        self.artists
            .first()
            .map(|artist| artist.name.clone())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopTracksResponse {
    pub items: Vec<Track>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentlyPlaying {
    pub item: Option<Track>,
    #[serde(default)]
    pub is_playing: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    pub uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowedArtistsResponse {
    pub artists: ArtistsContainer,
}

/// Only the first page is read, so the paging cursor is not modelled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistsContainer {
    pub items: Vec<Artist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayRequest {
    pub uris: Vec<String>,
}

/// Error body of the Web API: `{"error": {"status": 404, "message": "..."}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
}

/// Error body of the accounts service:
/// `{"error": "invalid_grant", "error_description": "..."}`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthErrorBody {
    pub error: String,
    pub error_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopTrack {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub uri: String,
}

impl From<Track> for TopTrack {
    fn from(track: Track) -> Self {
        let artist = track.primary_artist();
        TopTrack {
            id: track.id.unwrap_or_default(),
            name: track.name,
            artist,
            uri: track.uri,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowedArtist {
    pub id: String,
    pub name: String,
    pub uri: String,
}

impl From<Artist> for FollowedArtist {
    fn from(artist: Artist) -> Self {
        FollowedArtist {
            id: artist.id,
            name: artist.name,
            uri: artist.uri,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NowPlaying {
    pub name: String,
    pub artist: String,
    pub is_playing: bool,
}

impl NowPlaying {
    /// `None` when the player reports no item.
    pub fn from_playing(playing: Option<CurrentlyPlaying>) -> Option<Self> {
        let playing = playing?;
        let item = playing.item?;
        Some(NowPlaying {
            artist: item.primary_artist(),
            name: item.name,
            is_playing: playing.is_playing,
        })
    }
}

/// Usage hints embedded in the snapshot payload. `pause` advertises
/// `GET /spotify/pause`, the method the route is actually mounted with, where
/// older clients of this API saw `PUT`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actions {
    pub pause: String,
    pub play: String,
}

impl Default for Actions {
    fn default() -> Self {
        Actions {
            pause: "GET /spotify/pause".to_string(),
            play: "PUT /spotify/play/{trackId} (replace {trackId} with a track ID from topTracks)"
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub top_tracks: Vec<TopTrack>,
    pub now_playing: Option<NowPlaying>,
    pub followed_artists: Vec<FollowedArtist>,
    pub actions: Actions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            message: message.into(),
        }
    }
}
