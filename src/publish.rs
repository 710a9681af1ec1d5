//! Publishing processed images to object storage.
//!
//! Images are JPEG-encoded and written one after another under
//! `{prefix}/{destination_id}/{name}.jpg`. The first failure stops the run;
//! objects already written stay where they are.

use std::future::Future;
use std::io::Cursor;

use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use thiserror::Error;
use tracing::info;

pub const JPEG_QUALITY: u8 = 100;
pub const CACHE_CONTROL: &str = "public, max-age=86400";
const EXTENSION: &str = "jpg";

/// Failure reported by an [`ObjectStore`].
#[derive(Error, Debug)]
#[error("{0}")]
pub struct StoreError(#[source] pub Box<dyn std::error::Error + Send + Sync>);

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("failed to encode {name} as JPEG: {source}")]
    Encode {
        name: String,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to write {key}: {source}")]
    Write {
        key: String,
        #[source]
        source: StoreError,
    },
}

/// Headers attached to every written object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMetadata {
    pub content_type: String,
    pub cache_control: String,
    pub public_read: bool,
}

impl ObjectMetadata {
    /// Public, day-cacheable metadata for an object with the given extension.
    pub fn public_for_extension(extension: &str) -> Self {
        Self {
            content_type: content_type_for(extension).to_string(),
            cache_control: CACHE_CONTROL.to_string(),
            public_read: true,
        }
    }
}

/// MIME type for a file extension, `application/octet-stream` when unknown.
pub fn content_type_for(extension: &str) -> &'static str {
    ImageFormat::from_extension(extension)
        .map(|format| format.to_mime_type())
        .unwrap_or("application/octet-stream")
}

/// Somewhere objects can be written.
pub trait ObjectStore: Sync {
    fn put(
        &self,
        key: &str,
        body: Vec<u8>,
        metadata: &ObjectMetadata,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// [`ObjectStore`] backed by one S3 bucket.
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

impl ObjectStore for S3Store {
    async fn put(&self, key: &str, body: Vec<u8>, metadata: &ObjectMetadata) -> Result<(), StoreError> {
        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(&metadata.content_type)
            .cache_control(&metadata.cache_control);
        if metadata.public_read {
            request = request.acl(ObjectCannedAcl::PublicRead);
        }

        request
            .send()
            .await
            .map_err(|e| StoreError(Box::new(e.into_service_error())))?;
        Ok(())
    }
}

/// Encode an image as a maximum-quality JPEG. Alpha is discarded.
pub fn encode_jpeg(image: &DynamicImage) -> Result<Vec<u8>, image::ImageError> {
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    let mut buf = Cursor::new(Vec::new());
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY))?;
    Ok(buf.into_inner())
}

pub struct ImagePublisher<S> {
    store: S,
    key_prefix: String,
}

impl<S: ObjectStore> ImagePublisher<S> {
    pub fn new(store: S, key_prefix: impl Into<String>) -> Self {
        Self {
            store,
            key_prefix: key_prefix.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Object key for image `name` of `destination_id`.
    pub fn object_key(&self, destination_id: &str, name: &str) -> String {
        let prefix = self.key_prefix.trim_end_matches('/');
        if prefix.is_empty() {
            format!("{destination_id}/{name}.{EXTENSION}")
        } else {
            format!("{prefix}/{destination_id}/{name}.{EXTENSION}")
        }
    }

    /// Encode and write each `(name, image)` in order.
    pub async fn publish(
        &self,
        destination_id: &str,
        images: &[(&str, &DynamicImage)],
    ) -> Result<(), PublishError> {
        let metadata = ObjectMetadata::public_for_extension(EXTENSION);

        for (name, image) in images {
            let body = encode_jpeg(image).map_err(|source| PublishError::Encode {
                name: name.to_string(),
                source,
            })?;

            let key = self.object_key(destination_id, name);
            let size = body.len();
            self.store
                .put(&key, body, &metadata)
                .await
                .map_err(|source| PublishError::Write {
                    key: key.clone(),
                    source,
                })?;

            info!(key = %key, bytes = size, "Uploaded image");
        }

        Ok(())
    }
}
