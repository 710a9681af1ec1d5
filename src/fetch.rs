//! Source image download.
//!
//! Every fetch is two requests: a `HEAD` probe that rejects missing, unknown-size or
//! oversized resources before any body is transferred, then the `GET` itself,
//! which is validated the same way before its body is decoded.

use image::{DynamicImage, ImageFormat};
use reqwest::header::{HeaderMap, CONTENT_LENGTH};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::Config;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to download {url}: status {status}")]
    BadStatus { url: String, status: StatusCode },
    #[error("couldn't deduce content length of {url}")]
    UnknownLength { url: String },
    #[error("image is greater than {max_mb} MB in size ({size_mb:.2} MB): {url}")]
    TooLarge {
        url: String,
        size_mb: f64,
        max_mb: f64,
    },
    #[error("{url} is not a JPEG or PNG image")]
    UnsupportedFormat { url: String },
    #[error("failed to decode {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: image::ImageError,
    },
}

/// Raster formats the fetcher will decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
    Jpeg,
    Png,
}

impl RasterFormat {
    /// Identify the format from the leading magic bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];
        const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

        if bytes.starts_with(JPEG_MAGIC) {
            Some(Self::Jpeg)
        } else if bytes.starts_with(PNG_MAGIC) {
            Some(Self::Png)
        } else {
            None
        }
    }

    pub fn image_format(self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
        }
    }
}

/// Check a response's status and advertised size.
///
/// Returns the advertised length in bytes.
pub fn validate(
    url: &str,
    status: StatusCode,
    content_length: Option<u64>,
    max_mb: f64,
) -> Result<u64, FetchError> {
    if !status.is_success() {
        return Err(FetchError::BadStatus {
            url: url.to_string(),
            status,
        });
    }

    let length = content_length.ok_or_else(|| FetchError::UnknownLength {
        url: url.to_string(),
    })?;

    let size_mb = length as f64 / BYTES_PER_MB;
    if size_mb > max_mb {
        return Err(FetchError::TooLarge {
            url: url.to_string(),
            size_mb,
            max_mb,
        });
    }

    Ok(length)
}

/// Decode a downloaded body, sniffing the format from its content.
pub fn decode_image(url: &str, bytes: &[u8]) -> Result<DynamicImage, FetchError> {
    let format = RasterFormat::sniff(bytes).ok_or_else(|| FetchError::UnsupportedFormat {
        url: url.to_string(),
    })?;

    image::load_from_memory_with_format(bytes, format.image_format()).map_err(|source| {
        FetchError::Decode {
            url: url.to_string(),
            source,
        }
    })
}

/// The advertised `Content-Length`.
///
/// Read from the header rather than the body: a `HEAD` response has an empty
/// body whatever length it advertises.
pub fn advertised_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

pub struct ImageFetcher {
    client: Client,
    max_size_mb: f64,
}

impl ImageFetcher {
    pub fn new(client: Client, max_size_mb: f64) -> Self {
        Self {
            client,
            max_size_mb,
        }
    }

    /// Build a fetcher with its own HTTP client, honouring the configured timeout.
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.http_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self::new(builder.build()?, config.max_image_size_mb))
    }

    pub async fn fetch(&self, url: &str) -> Result<DynamicImage, FetchError> {
        let transport = |source: reqwest::Error| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let probe = self.client.head(url).send().await.map_err(transport)?;
        let advertised = validate(
            url,
            probe.status(),
            advertised_length(probe.headers()),
            self.max_size_mb,
        )?;
        debug!(url = %url, bytes = advertised, "Probe accepted");

        let response = self.client.get(url).send().await.map_err(transport)?;
        validate(
            url,
            response.status(),
            advertised_length(response.headers()),
            self.max_size_mb,
        )?;

        let body = response.bytes().await.map_err(transport)?;
        let image = decode_image(url, &body)?;

        info!(
            url = %url,
            bytes = body.len(),
            width = image.width(),
            height = image.height(),
            "Downloaded source image"
        );
        Ok(image)
    }
}
