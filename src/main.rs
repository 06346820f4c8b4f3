use anyhow::Result;
use garment_site_backend::config::Config;
use garment_site_backend::i18n::Localizer;
use garment_site_backend::mailer::SmtpFactory;
use garment_site_backend::server::{self, AppState};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("garment_site_backend=info".parse()?),
        )
        .init();

    info!("Starting garment site backend");

    // Load configuration from environment
    let config = Config::from_env()?;

    // Restore the persisted language preference and load its pack
    let localizer = Arc::new(Localizer::new(
        config.i18n_base_url.clone(),
        config.language_pref_file.clone(),
    ));
    localizer.init().await;
    info!("Active language: {}", localizer.current_language().code());

    let state = AppState {
        site_name: config.site_name.clone(),
        factory: Arc::new(SmtpFactory),
        localizer,
    };
    let app = server::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
