use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use resume_builder::backend_client::HttpBackend;
use resume_builder::cli;
use resume_builder::config::Config;
use resume_builder::session::Session;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Logs go to stderr; stdout belongs to the interactive screen.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("resume_builder={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting resume builder v{}", env!("CARGO_PKG_VERSION"));

    let backend = HttpBackend::new(config.backend_url.clone());
    info!("Backend client initialized (base: {})", backend.base_url());

    let session = Session::new(Arc::new(backend));
    cli::run(session).await?;

    info!("Session closed");
    Ok(())
}
