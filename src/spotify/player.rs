use reqwest::StatusCode;

use super::{SpotifyClient, SpotifyError, check};
use crate::types::{CurrentlyPlaying, PlayRequest};

impl SpotifyClient {
    /// Reads what the user is currently playing.
    ///
    /// The Web API answers `204 No Content` when nothing is playing or no
    /// device is active; that is reported as `Ok(None)`, not as an error.
    pub async fn currently_playing(
        &self,
        token: &str,
    ) -> Result<Option<CurrentlyPlaying>, SpotifyError> {
        let response = self
            .http
            .get(self.endpoint(&["me", "player", "currently-playing"])?)
            .bearer_auth(token)
            .send()
            .await?;

        let response = check(response).await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let bytes = response.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// Pauses playback on the user's active device.
    pub async fn pause(&self, token: &str) -> Result<(), SpotifyError> {
        let response = self
            .http
            .put(self.endpoint(&["me", "player", "pause"])?)
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_LENGTH, 0)
            .send()
            .await?;

        check(response).await?;
        Ok(())
    }

    /// Starts playback of exactly `uris` on the active device, replacing
    /// whatever was playing.
    pub async fn play(&self, token: &str, uris: Vec<String>) -> Result<(), SpotifyError> {
        let response = self
            .http
            .put(self.endpoint(&["me", "player", "play"])?)
            .bearer_auth(token)
            .json(&PlayRequest { uris })
            .send()
            .await?;

        check(response).await?;
        Ok(())
    }
}

