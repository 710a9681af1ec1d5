use aws_sdk_s3::Client;
use event_thumbnailer::{Config, ImageFetcher, ImagePublisher, Invocation, Processor, S3Store};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};

async fn function_handler(
    processor: &Processor<S3Store>,
    event: LambdaEvent<Invocation>,
) -> Result<(), Error> {
    if let Err(err) = processor.handle(event).await {
        tracing::error!(error = %err, "Error processing image");
        return Err(Error::from(err));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        // disable printing the name of the module in every log line.
        .with_target(false)
        // CloudWatch shows ANSI escapes verbatim.
        .with_ansi(false)
        // disabling time is handy because CloudWatch will add the ingestion time.
        .without_time()
        .init();

    let config = Config::from_env()?;
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let store = S3Store::new(Client::new(&aws_config), &config.bucket);

    let processor = Processor::new(
        ImageFetcher::from_config(&config)?,
        ImagePublisher::new(store, &config.key_prefix),
    );
    tracing::info!(bucket = %config.bucket, prefix = %config.key_prefix, "Thumbnailer ready");

    run(service_fn(|event| function_handler(&processor, event))).await
}
