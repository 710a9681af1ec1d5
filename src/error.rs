use thiserror::Error;

use crate::fetch::FetchError;
use crate::publish::PublishError;
use crate::request::DecodeError;
use crate::transform::TransformError;

/// Anything that can fail a single invocation.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("invalid request: {0}")]
    Decode(#[from] DecodeError),
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("transform failed: {0}")]
    Transform(#[from] TransformError),
    #[error("publish failed: {0}")]
    Publish(#[from] PublishError),
}

pub type Result<T> = std::result::Result<T, ProcessError>;
