//! Runtime configuration, read from `THUMBNAILER_*` environment variables.

use serde::Deserialize;
use std::time::Duration;

const ENV_PREFIX: &str = "THUMBNAILER_";

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Config {
    /// Destination bucket for published images.
    pub bucket: String,
    /// Namespace under which every destination id is written.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    /// Largest source image accepted, in MB (1 MB = 1024 * 1024 bytes).
    #[serde(default = "default_max_image_size_mb")]
    pub max_image_size_mb: f64,
    /// Per-request timeout for the image download. Unset means the client default.
    #[serde(default)]
    pub http_timeout_secs: Option<u64>,
}

fn default_key_prefix() -> String {
    "images/events".to_string()
}

fn default_max_image_size_mb() -> f64 {
    3.0
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed(ENV_PREFIX).from_env()
    }

    /// Defaults for everything except the bucket.
    pub fn for_bucket(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key_prefix: default_key_prefix(),
            max_image_size_mb: default_max_image_size_mb(),
            http_timeout_secs: None,
        }
    }

    pub fn http_timeout(&self) -> Option<Duration> {
        self.http_timeout_secs.map(Duration::from_secs)
    }
}
