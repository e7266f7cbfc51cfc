use kapua_core::{config, KapuaCore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(default_filter: &str) {
    // KAPUA_LOG_FORMAT=json switches to machine readable output
    let log_format = std::env::var("KAPUA_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::get_or_init().await?;
    init_tracing(&config.log_filter);

    let core = KapuaCore::start_with(config).await?;
    tracing::info!(database = %core.config.database_path().display(), "kapua running, ctrl-c to stop");

    tokio::signal::ctrl_c().await?;

    core.shutdown().await
}
