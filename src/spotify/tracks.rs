use super::{SpotifyClient, SpotifyError};
use crate::types::{TopTracksResponse, Track};

pub const MAX_TOP_TRACKS: u32 = 50;

impl SpotifyClient {
    /// The user's top tracks in the provider's relevance order.
    pub async fn top_tracks(&self, token: &str, limit: u32) -> Result<Vec<Track>, SpotifyError> {
        let limit = limit.clamp(1, MAX_TOP_TRACKS);
        let res: TopTracksResponse = self
            .get_json(token, &["me", "top", "tracks"], &[("limit", limit.to_string())])
            .await?;

        Ok(res.items)
    }

    /// Looks up a single track by its Spotify id.
    pub async fn track(&self, token: &str, id: &str) -> Result<Track, SpotifyError> {
        self.get_json(token, &["tracks", id], &[]).await
    }
}
