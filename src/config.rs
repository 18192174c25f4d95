use std::time::Duration;

use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Spotify client-credentials identifier
    pub spotify_client_id: String,

    /// Spotify client-credentials secret
    pub spotify_client_secret: String,

    /// Gemini API key
    pub gemini_api_key: String,

    /// Song table artifact (JSON records)
    #[serde(default = "default_songs_path")]
    pub songs_path: String,

    /// Similarity matrix artifact (JSON array of rows)
    #[serde(default = "default_similarity_path")]
    pub similarity_path: String,

    /// Spotify Web API base URL
    #[serde(default = "default_spotify_api_url")]
    pub spotify_api_url: String,

    /// Spotify accounts service base URL (token endpoint)
    #[serde(default = "default_spotify_accounts_url")]
    pub spotify_accounts_url: String,

    /// Gemini API base URL
    #[serde(default = "default_gemini_api_url")]
    pub gemini_api_url: String,

    /// Gemini model identifier
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Timeout applied to every outbound HTTP request
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Sessions with no activity for this long are discarded
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,
}

fn default_songs_path() -> String {
    "data/songs.json".to_string()
}

fn default_similarity_path() -> String {
    "data/similarity.json".to_string()
}

fn default_spotify_api_url() -> String {
    "https://api.spotify.com/v1".to_string()
}

fn default_spotify_accounts_url() -> String {
    "https://accounts.spotify.com".to_string()
}

fn default_gemini_api_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_gemini_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_http_timeout_secs() -> u64 {
    10
}

fn default_session_idle_secs() -> u64 {
    30 * 60
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit set of variables
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Secrets that are present but blank count as missing
    fn validate(&self) -> anyhow::Result<()> {
        let secrets = [
            ("SPOTIFY_CLIENT_ID", &self.spotify_client_id),
            ("SPOTIFY_CLIENT_SECRET", &self.spotify_client_secret),
            ("GEMINI_API_KEY", &self.gemini_api_key),
        ];
        for (name, value) in secrets {
            if value.trim().is_empty() {
                anyhow::bail!("Failed to load config: {} is empty", name);
            }
        }
        if self.session_idle_secs == 0 {
            anyhow::bail!("Failed to load config: SESSION_IDLE_SECS must be positive");
        }
        Ok(())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn session_idle(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
