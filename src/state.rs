use std::sync::Arc;

use sqlx::PgPool;

use crate::external::price_provider::PriceProvider;
use crate::services::suggestion_service::SuggestionService;

#[derive(Clone)]
pub struct AppState {
    /// Recommendation log; `None` when no database is configured
    pub pool: Option<PgPool>,
    pub price_provider: Arc<dyn PriceProvider>,
    pub suggestions: Arc<SuggestionService>,
}
