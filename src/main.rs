use anyhow::Context;
use fishlog::api::AppState;
use fishlog::config::LoggingConfig;
use fishlog::{FishLogConfig, FishLogError, LogStore, WeatherGateway, web};
use tracing_subscriber::EnvFilter;

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("fishlog={},tower_http=info", logging.level)));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = FishLogConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.logging);

    tracing::info!("Starting FishLog v{}", fishlog::VERSION);

    let store = LogStore::open(&config.store.location)
        .with_context(|| format!("Failed to open store at {}", config.store.location))?;

    let gateway = match WeatherGateway::from_config(&config) {
        Ok(gateway) => Some(gateway),
        Err(FishLogError::Config { message }) => {
            tracing::warn!("Weather routes disabled: {message}");
            None
        }
        Err(err) => return Err(err).context("Failed to build weather gateway"),
    };

    web::run(AppState::new(gateway, store), config.server.port).await
}
