use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

use finagent::config::AppConfig;
use finagent::db::recommendation_queries;
use finagent::external::yahoofinance::YahooFinanceProvider;
use finagent::logging::init_logging;
use finagent::services::llm_service::LlmService;
use finagent::services::suggestion_service::SuggestionService;
use finagent::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("invalid configuration")?;

    // Initialize logging FIRST
    init_logging(config.logging.clone()).map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    let pool = match &config.database_url {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await
                .context("failed to connect to DATABASE_URL")?;
            recommendation_queries::init_schema(&pool)
                .await
                .context("failed to create recommendation table")?;
            tracing::info!("🗄️ Recommendation log enabled");
            Some(pool)
        }
        None => {
            tracing::info!("DATABASE_URL not set, recommendation log disabled");
            None
        }
    };

    tracing::info!("📊 Using price provider: Yahoo Finance ({})", config.price.base_url);
    let state = AppState {
        pool,
        price_provider: Arc::new(YahooFinanceProvider::new(&config.price)),
        suggestions: Arc::new(SuggestionService::new(LlmService::new(config.llm.clone()))),
    };
    let app = finagent::app::create_app(state);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!("🚀 Financial agent backend running at http://{}/", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
