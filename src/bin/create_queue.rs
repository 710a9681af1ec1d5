//! Create the request queue the thumbnailer consumes, if it does not exist yet.

use std::path::PathBuf;
use std::process::ExitCode;

use aws_config::BehaviorVersion;
use aws_runtime::env_config::file::{EnvConfigFileKind, EnvConfigFiles};
use clap::Parser;

const QUEUE_NAME: &str = "image-processing-requests";

#[derive(Parser, Debug)]
#[command(about = "Create the image processing request queue")]
struct Cli {
    /// AWS shared credentials file to use instead of the default lookup.
    #[arg(long, value_name = "PATH")]
    credentials_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(path) = cli.credentials_file {
        let files = EnvConfigFiles::builder()
            .with_file(EnvConfigFileKind::Credentials, path)
            .build();
        loader = loader.profile_files(files);
    }
    let client = aws_sdk_sqs::Client::new(&loader.load().await);

    match client.create_queue().queue_name(QUEUE_NAME).send().await {
        Ok(output) => {
            println!(
                "Successfully created queue: {}",
                output.queue_url().unwrap_or(QUEUE_NAME)
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Failed to create queue: {}", err.into_service_error());
            ExitCode::FAILURE
        }
    }
}
