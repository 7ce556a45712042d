use tracing_subscriber::EnvFilter;

mod api;
mod catalog;
mod config;
mod overlay;
mod stream;
mod terminal;
mod view;

use api::AppState;
use catalog::CatalogSource;
use config::Config;
use stream::StreamProbe;
use terminal::Terminal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("camterm=debug".parse()?))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if !config.probe.enabled {
        tracing::warn!("stream probe disabled, every http(s) stream is treated as available");
    }

    let probe = StreamProbe::new(&config.probe)?;
    let terminal = Terminal::new(&config, probe);

    let source = CatalogSource::parse(&config.catalog.source);
    let view = terminal.load(&source).await;
    tracing::info!(cameras = view.catalog().len(), "camera terminal ready");

    let state = AppState::new(terminal);

    tokio::select! {
        result = api::start_server(state, config.http.port) => {
            if let Err(e) = result {
                tracing::error!("HTTP server failed: {}", e);
                return Err(e.into());
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
        }
    }

    tracing::info!("shutdown complete");

    Ok(())
}
