use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::{Url, header::AUTHORIZATION};

use super::{SpotifyClient, SpotifyError, check, decode};
use crate::types::{Token, TokenResponse};

/// Scopes requested for the proxy: top items, currently playing, playback
/// control and followed artists.
pub const SCOPES: [&str; 4] = [
    "user-top-read",
    "user-read-currently-playing",
    "user-modify-playback-state",
    "user-follow-read",
];

impl SpotifyClient {
    /// Builds the authorization URL the user agent is redirected to.
    ///
    /// # Errors
    ///
    /// Fails only if the configured authorization URL cannot be parsed.
    pub fn authorize_url(&self, scopes: &[&str]) -> Result<Url, SpotifyError> {
        let mut url =
            Url::parse(&self.auth_url).map_err(|e| SpotifyError::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("scope", &scopes.join(" "));
        Ok(url)
    }

    /// Exchanges an authorization code for an access/refresh token pair.
    pub async fn exchange_code(&self, code: &str) -> Result<Token, SpotifyError> {
        let response = self
            .request_token(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", &self.redirect_uri),
            ])
            .await?;

        Ok(response.into_token(None))
    }

    /// Mints a new access token. The accounts service may rotate the refresh
    /// token; when it does not, the given one is kept.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<Token, SpotifyError> {
        let response = self
            .request_token(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .await?;

        Ok(response.into_token(Some(refresh_token)))
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Result<TokenResponse, SpotifyError> {
        let res = self
            .http
            .post(&self.token_url)
            .header(AUTHORIZATION, self.basic_credentials())
            .form(form)
            .send()
            .await?;

        decode(check(res).await?).await
    }

    fn basic_credentials(&self) -> String {
        let credentials = format!("{}:{}", self.client_id, self.client_secret);
        format!("Basic {}", STANDARD.encode(credentials))
    }
}
