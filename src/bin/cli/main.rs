use anyhow::{Context, Result};
use bytes::Bytes;
use clap::{Parser, Subcommand};
use image_bucket::{
    adapters::inbound::http::UploadSettings,
    app::AppBuilder,
    config::{init_logging, load_dotenv, StoreArgs},
    ports::services::BlobStore,
};
use std::{path::PathBuf, process::ExitCode, time::Duration};

#[derive(Parser, Debug)]
#[command(name = "image-bucket-cli")]
#[command(about = "Run blob-store operations against the configured bucket", long_about = None)]
struct Cli {
    #[command(flatten)]
    store: StoreArgs,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check whether a bucket exists (the configured one by default)
    BucketExists {
        /// Bucket name
        name: Option<String>,
    },

    /// Check whether an object exists
    Exists {
        /// Object key
        key: String,
    },

    /// Upload a local file
    Upload {
        /// File path to upload
        file: PathBuf,
        /// Object key
        key: String,
    },

    /// Download an object to a local file
    Download {
        /// Object key
        key: String,
        /// Output file path
        path: PathBuf,
    },

    /// Print a signed URL for an object
    Publish {
        /// Object key
        key: String,
        /// URL lifetime in seconds (configured default when omitted)
        #[arg(long)]
        ttl_secs: Option<u64>,
    },

    /// Delete every object under a key or prefix
    Remove {
        /// Key or prefix
        prefix: String,
    },
}

async fn run(cli: Cli) -> Result<bool> {
    let config = cli
        .store
        .to_app_config(UploadSettings::default())
        .context("Invalid configuration")?;
    let app = AppBuilder::new(config.bucket.clone())
        .with_config(config)
        .build()
        .await
        .context("Failed to connect to the blob store")?;
    let store = app.blob_store;

    match cli.command {
        Commands::BucketExists { name } => {
            let exists = store.does_bucket_exist(name.as_deref()).await;
            println!("{}", exists);
            Ok(exists)
        }
        Commands::Exists { key } => {
            let exists = store.does_object_exist(&key).await?;
            println!("{}", exists);
            Ok(exists)
        }
        Commands::Upload { file, key } => {
            let content = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let handle = store.upload_object(Bytes::from(content), &key).await?;
            println!("Uploaded {} ({} bytes)", handle.key, handle.size);
            Ok(true)
        }
        Commands::Download { key, path } => {
            store.download_object(&key, &path).await?;
            println!("Downloaded {} to {}", key, path.display());
            Ok(true)
        }
        Commands::Publish { key, ttl_secs } => {
            let signed = store
                .publish(&key, ttl_secs.map(Duration::from_secs))
                .await?;
            println!("{}", signed.url);
            println!("Expires at {}", signed.expires_at.to_rfc3339());
            Ok(true)
        }
        Commands::Remove { prefix } => {
            let removed = store.remove(&prefix).await?;
            println!("Removed {} objects", removed);
            Ok(true)
        }
    }
}

/// Exit code 1 when an existence check answers `false`
#[tokio::main]
async fn main() -> Result<ExitCode> {
    load_dotenv();

    let cli = Cli::parse();
    init_logging(&cli.log_level);

    Ok(if run(cli).await? {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
