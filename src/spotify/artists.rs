use super::{SpotifyClient, SpotifyError};
use crate::types::{Artist, FollowedArtistsResponse};

/// Upper bound the Web API accepts for one page of followed artists.
pub const MAX_FOLLOWED_ARTISTS: u32 = 50;

impl SpotifyClient {
    /// Fetches the first page of artists the user follows, at most `limit`
    /// (clamped to 1..=50).
    pub async fn followed_artists(
        &self,
        token: &str,
        limit: u32,
    ) -> Result<Vec<Artist>, SpotifyError> {
        let limit = limit.clamp(1, MAX_FOLLOWED_ARTISTS);
        let res: FollowedArtistsResponse = self
            .get_json(
                token,
                &["me", "following"],
                &[("type", "artist".to_string()), ("limit", limit.to_string())],
            )
            .await?;

        Ok(res.artists.items)
    }
}
