//! Background image source. Fetched fresh on every request: no cache, no retry.

use async_trait::async_trait;
use bytes::Bytes;
use image::DynamicImage;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Background fetch returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Background image could not be decoded: {0}")]
    Decode(#[from] image::ImageError),
}

#[async_trait]
pub trait BackgroundSource: Send + Sync {
    async fn fetch(&self) -> Result<DynamicImage, FetchError>;
}

/// Downloads the background from a fixed URL.
#[derive(Clone)]
pub struct HttpBackground {
    client: Client,
    url: String,
}

impl HttpBackground {
    pub fn new(url: String) -> Result<Self, FetchError> {
        Ok(Self {
            client: Client::builder()
                .user_agent(concat!("quote-api/", env!("CARGO_PKG_VERSION")))
                .build()?,
            url,
        })
    }

    async fn download(&self) -> Result<Bytes, FetchError> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }
        Ok(response.bytes().await?)
    }
}

#[async_trait]
impl BackgroundSource for HttpBackground {
    async fn fetch(&self) -> Result<DynamicImage, FetchError> {
        let bytes = self.download().await?;
        let image = decode_background(&bytes)?;
        debug!(
            "Fetched background {}x{} from {}",
            image.width(),
            image.height(),
            self.url
        );
        Ok(image)
    }
}

pub(crate) fn decode_background(bytes: &[u8]) -> Result<DynamicImage, FetchError> {
    Ok(image::load_from_memory(bytes)?)
}
