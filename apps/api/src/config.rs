use anyhow::{Context, Result};

pub const DEFAULT_PORT: u16 = 4887;
pub const DEFAULT_RENDERER_URL: &str = "http://localhost:3000";
pub const DEFAULT_BACKGROUND_IMAGE_URL: &str =
    "https://i.pinimg.com/564x/d3/6b/cc/d36bcceceaa1d390489ec70d93154311.jpg";

/// Application configuration loaded from environment variables.
/// Every variable has a default; only a malformed `PORT` fails startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Credential forwarded to the bubble renderer. Empty when unset.
    pub token: String,
    pub renderer_url: String,
    pub background_image_url: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source.
    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("PORT must be a valid port number, got '{raw}'"))?,
            None => DEFAULT_PORT,
        };

        Ok(Config {
            token: lookup("TOKEN").unwrap_or_default(),
            renderer_url: lookup("RENDERER_URL")
                .unwrap_or_else(|| DEFAULT_RENDERER_URL.to_string()),
            background_image_url: lookup("BACKGROUND_IMAGE_URL")
                .unwrap_or_else(|| DEFAULT_BACKGROUND_IMAGE_URL.to_string()),
            port,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}
