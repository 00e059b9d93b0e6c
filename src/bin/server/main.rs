use anyhow::{Context, Result};
use clap::Parser;
use image_bucket::{
    adapters::inbound::http::{
        router::{
            create_router, DEFAULT_KEY_PREFIX, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_UPLOAD_FIELD,
            DEFAULT_UPLOAD_ROUTE,
        },
        UploadSettings,
    },
    app::AppBuilder,
    config::{init_logging, load_dotenv, StoreArgs},
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "image-bucket-server")]
#[command(about = "HTTP upload service backed by an S3 bucket", long_about = None)]
struct Cli {
    /// Server port to listen on
    #[arg(short, long, env = "AWS_API_PORT", default_value = "3000")]
    port: u16,

    /// Server host to bind to
    #[arg(long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Path of the upload route
    #[arg(long, env = "UPLOAD_ROUTE", default_value = DEFAULT_UPLOAD_ROUTE)]
    upload_route: String,

    /// Multipart field carrying the file
    #[arg(long, env = "UPLOAD_FIELD", default_value = DEFAULT_UPLOAD_FIELD)]
    upload_field: String,

    /// Prefix of the keys uploads are stored under
    #[arg(long, env = "KEY_PREFIX", default_value = DEFAULT_KEY_PREFIX)]
    key_prefix: String,

    /// Largest accepted request body, in bytes
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    max_upload_bytes: usize,

    #[command(flatten)]
    store: StoreArgs,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Cli {
    fn upload_settings(&self) -> Result<UploadSettings> {
        if !self.upload_route.starts_with('/') {
            anyhow::bail!("UPLOAD_ROUTE must start with '/': {}", self.upload_route);
        }

        Ok(UploadSettings {
            route: self.upload_route.clone(),
            field_name: self.upload_field.clone(),
            key_prefix: self.key_prefix.clone(),
            max_upload_bytes: self.max_upload_bytes,
        })
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down"),
        Err(e) => error!("Failed to listen for Ctrl+C: {}", e),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    load_dotenv();

    let cli = Cli::parse();
    init_logging(&cli.log_level);

    info!("Starting image bucket server");
    info!("Storage backend: {}", cli.store.storage_backend);

    let config = cli
        .store
        .to_app_config(cli.upload_settings()?)
        .context("Invalid configuration")?;

    let bucket = config.bucket.clone();
    let app_services = AppBuilder::new(bucket)
        .with_config(config)
        .build()
        .await
        .context("Failed to build application")?;

    let upload_route = app_services.upload.route.clone();
    let router = create_router(app_services.into_state());

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port)
        .parse()
        .context("Invalid listen address")?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server listening on http://{} (uploads at {})", addr, upload_route);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}
