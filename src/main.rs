use std::sync::Arc;

use hram_api::{
    config::Config,
    db::{create_pool, CatalogRepository, MemoryCatalog, PgCatalog},
    models::LimitPolicy,
    routes::{create_router, AppState},
    services::{CurationRules, RecommendationEngine, StaticCalendar},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("hram_api=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // A fixture file replaces PostgreSQL entirely
    let catalog: Arc<dyn CatalogRepository> = match &config.catalog_fixture_path {
        Some(path) => Arc::new(MemoryCatalog::from_json_file(path).await?),
        None => {
            let pool = create_pool(&config.database_url, config.database_max_connections).await?;
            tracing::info!("Connected to PostgreSQL");
            Arc::new(PgCatalog::new(pool))
        }
    };

    let rules = match &config.curation_rules_path {
        Some(path) => CurationRules::from_json_file(path).await?,
        None => CurationRules::default(),
    };

    let engine = RecommendationEngine::new(catalog, Arc::new(StaticCalendar::default()), rules)
        .with_calendar_window(config.calendar_window_days);

    let limits = LimitPolicy {
        default: config.default_limit,
        max: config.max_limit,
    };
    let app = create_router(Arc::new(AppState::new(engine, limits)));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
