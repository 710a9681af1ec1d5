use aws_lambda_events::event::sqs::SqsEvent;
use image::DynamicImage;
use lambda_runtime::LambdaEvent;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::Result;
use crate::fetch::ImageFetcher;
use crate::publish::{ImagePublisher, ObjectStore};
use crate::request::{self, PubSubMessage};
use crate::transform;

/// Payloads the function accepts: a bare message or an SQS batch of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Invocation {
    Message(PubSubMessage),
    Queue(SqsEvent),
}

pub struct Processor<S> {
    fetcher: ImageFetcher,
    publisher: ImagePublisher<S>,
}

impl<S: ObjectStore> Processor<S> {
    pub fn new(fetcher: ImageFetcher, publisher: ImagePublisher<S>) -> Self {
        Self { fetcher, publisher }
    }

    pub fn publisher(&self) -> &ImagePublisher<S> {
        &self.publisher
    }

    /// Decode, fetch, transform and publish one message.
    ///
    /// `fallback_id` namespaces the output when the message has no event id.
    pub async fn process_message(&self, message: &PubSubMessage, fallback_id: &str) -> Result<()> {
        let request = request::decode(message)?;
        let destination = request.destination_id(fallback_id);
        info!(url = %request.url, destination = %destination, "Received request to download");

        let source = self.fetcher.fetch(&request.url).await?;
        let thumb = DynamicImage::ImageRgba8(transform::transform(&source)?);

        self.publisher
            .publish(destination, &[("main", &source), ("thumb", &thumb)])
            .await?;

        info!(destination = %destination, "Processed image");
        Ok(())
    }

    /// Process every message in the invocation, stopping at the first error.
    pub async fn handle(&self, event: LambdaEvent<Invocation>) -> Result<()> {
        let (payload, context) = event.into_parts();

        match payload {
            Invocation::Message(message) => {
                self.process_message(&message, &context.request_id).await
            }
            Invocation::Queue(batch) => {
                for record in batch.records {
                    let fallback = record.message_id.as_deref().unwrap_or(&context.request_id);
                    let Some(body) = record.body.as_deref() else {
                        warn!(message_id = %fallback, "Skipping SQS record without a body");
                        continue;
                    };
                    let message: PubSubMessage = serde_json::from_str(body)
                        .map_err(request::DecodeError::BadFormat)?;
                    self.process_message(&message, fallback).await?;
                }
                Ok(())
            }
        }
    }
}
