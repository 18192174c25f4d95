//! Spotify Web API provider
//!
//! Authenticates with the client-credentials flow and searches tracks by
//! structured `track:` / `artist:` fields.
//!
//! API Flow:
//! 1. Token: POST {accounts}/api/token (basic auth, grant_type=client_credentials)
//! 2. Search: GET {api}/search?q=track:{song} artist:{artist}&type=track&limit=1

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::{Client as HttpClient, StatusCode};
use tokio::sync::RwLock;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{SpotifySearchResponse, SpotifyToken, TrackMatch},
    services::providers::MusicSearchProvider,
};

/// Tokens are refreshed this long before the provider says they expire
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

#[derive(Clone)]
pub struct SpotifyProvider {
    http_client: HttpClient,
    client_id: String,
    client_secret: String,
    api_url: String,
    accounts_url: String,
    token: Arc<RwLock<Option<CachedToken>>>,
}

impl SpotifyProvider {
    pub fn new(
        http_client: HttpClient,
        client_id: String,
        client_secret: String,
        api_url: String,
        accounts_url: String,
    ) -> Self {
        Self {
            http_client,
            client_id,
            client_secret,
            api_url,
            accounts_url,
            token: Arc::new(RwLock::new(None)),
        }
    }

    /// Creates a provider with a timeout-bounded HTTP client
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(config.http_timeout())
            .build()?;

        Ok(Self::new(
            http_client,
            config.spotify_client_id.clone(),
            config.spotify_client_secret.clone(),
            config.spotify_api_url.clone(),
            config.spotify_accounts_url.clone(),
        ))
    }

    /// Structured search query for a title/artist pair
    pub fn search_query(song: &str, artist: &str) -> String {
        format!("track:{} artist:{}", song, artist)
    }

    /// Returns a cached access token, fetching a new one if needed
    async fn access_token(&self) -> AppResult<String> {
        {
            let guard = self.token.read().await;
            if let Some(token) = guard.as_ref() {
                if token.expires_at > Instant::now() {
                    return Ok(token.access_token.clone());
                }
            }
        }

        let token = self.fetch_token().await?;
        let access_token = token.access_token.clone();
        *self.token.write().await = Some(token);
        Ok(access_token)
    }

    async fn fetch_token(&self) -> AppResult<CachedToken> {
        let url = format!("{}/api/token", self.accounts_url);

        let response = self
            .http_client
            .post(&url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Spotify token request returned status {}: {}",
                status, body
            )));
        }

        let token: SpotifyToken = response.json().await?;

        tracing::debug!(expires_in = token.expires_in, "Obtained Spotify access token");

        Ok(CachedToken {
            access_token: token.access_token,
            expires_at: Instant::now()
                + Duration::from_secs(token.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN),
        })
    }

    async fn invalidate_token(&self) {
        *self.token.write().await = None;
    }
}

#[async_trait::async_trait]
impl MusicSearchProvider for SpotifyProvider {
    async fn search_track(&self, song: &str, artist: &str) -> AppResult<Option<TrackMatch>> {
        let access_token = self.access_token().await?;
        let query = Self::search_query(song, artist);
        let url = format!("{}/search", self.api_url);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&access_token)
            .query(&[("q", query.as_str()), ("type", "track"), ("limit", "1")])
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            self.invalidate_token().await;
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Spotify API returned status {}: {}",
                status, body
            )));
        }

        let results: SpotifySearchResponse = response.json().await?;
        let found = results
            .tracks
            .and_then(|page| page.items.into_iter().next())
            .map(TrackMatch::from);

        tracing::info!(
            song = %song,
            artist = %artist,
            found = found.is_some(),
            provider = "spotify",
            "Track search completed"
        );

        Ok(found)
    }

    fn name(&self) -> &'static str {
        "spotify"
    }
}
