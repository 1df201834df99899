use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use musiclib_lib::App;

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,musiclib=debug,musiclib_core=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  info!(config = %musiclib_config::PATHS.config_file().display(), "starting musiclib");

  let app = App::bootstrap().context("failed to start musiclib")?;
  info!("musiclib ready, press Ctrl+C to stop");

  tokio::signal::ctrl_c().await.context("failed to listen for Ctrl+C")?;

  info!(pending = app.pending_events(), "shutting down");
  let stats = app.shutdown().await.context("notification listener crashed")?;
  info!(delivered = stats.delivered, failed = stats.failed, "bye");

  Ok(())
}
