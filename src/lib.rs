//! # event-thumbnailer
//!
//! A Lambda function that turns an image URL into a pair of published images:
//! the original (`main`) and an 800x534 center-cropped thumbnail (`thumb`).
//!
//! ```text
//! message ──▶ request::decode ──▶ ImageFetcher::fetch ──▶ transform ──▶ ImagePublisher::publish
//!   base64 JSON     Url, EventID      HEAD + GET, ≤ 3 MB     3:2 crop     images/events/{id}/{main,thumb}.jpg
//!                                                            Lanczos3
//! ```
//!
//! | Module | Responsibility |
//! |---|---|
//! | [`request`] | Envelope and payload decoding |
//! | [`fetch`] | Download, size checks, format sniffing |
//! | [`transform`] | Crop geometry and resize |
//! | [`publish`] | JPEG encoding and object storage writes |
//! | [`handler`] | Wiring the above per invocation |
//! | [`config`] | `THUMBNAILER_*` environment configuration |

pub mod config;
pub mod error;
pub mod fetch;
pub mod handler;
pub mod publish;
pub mod request;
pub mod transform;

pub use config::Config;
pub use error::{ProcessError, Result};
pub use fetch::{FetchError, ImageFetcher, RasterFormat};
pub use handler::{Invocation, Processor};
pub use publish::{ImagePublisher, ObjectMetadata, ObjectStore, PublishError, S3Store, StoreError};
pub use request::{DecodeError, ProcessingRequest, PubSubMessage};
pub use transform::{crop_rect, transform, Rectangle, TransformError};
