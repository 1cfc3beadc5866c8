use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use tracing::{error, info, warn};

use crate::db::recommendation_queries;
use crate::errors::AppError;
use crate::models::{GoalCategory, NewRecommendation, RecommendRequest, RecommendResponse};
use crate::services::suggestion_service::{self, WATCHLIST};
use crate::services::{allocation_service, savings_service};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/portfolio", post(recommend_portfolio))
}

/// POST /recommend/portfolio
///
/// Asset allocation for an age and goal, plus stock, mutual fund and travel
/// suggestions and savings tips derived from the expenses.
#[axum::debug_handler]
pub async fn recommend_portfolio(
    State(state): State<AppState>,
    payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> Result<Json<RecommendResponse>, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        error!("Rejected recommendation body: {}", rejection.body_text());
        AppError::from(rejection)
    })?;
    info!("POST /recommend/portfolio - age={:?}, goal={:?}", request.age, request.goal);

    let parsed = request
        .age_text()
        .and_then(|text| allocation_service::parse_age(text).map(|age| (text.to_string(), age)));
    let Some((age_group, age)) = parsed else {
        error!("Invalid age provided: {:?}", request.age);
        return Err(AppError::Validation("Invalid age provided.".to_string()));
    };

    if let Some((category, amount)) = request.expenses.first_invalid() {
        error!("Invalid expense amount for {}: {}", category, amount);
        return Err(AppError::Validation(format!(
            "Expense amount for '{}' must be a non-negative number.",
            category
        )));
    }

    let goal = GoalCategory::classify(&request.goal);
    let asset_allocation = allocation_service::dynamic_allocation(age, goal);
    info!("Allocation for age {} ({}): {:?}", age, goal, asset_allocation);

    let travel_budget = request.expenses.get("travel");
    let travel = async {
        match travel_budget {
            Some(budget) => state.suggestions.travel_suggestions(budget).await,
            None => Vec::new(),
        }
    };

    let (stock_suggestions, mutual_fund_suggestions, travel_suggestions) = tokio::join!(
        suggestion_service::top_movers(state.price_provider.as_ref(), &WATCHLIST),
        state.suggestions.mutual_fund_suggestions(),
        travel,
    );

    let savings_tips = savings_service::suggest_savings(&request.expenses);

    if let Some(pool) = &state.pool {
        let record = NewRecommendation {
            age_group,
            goal: request.goal.clone(),
            recommended_stocks: stock_suggestions.join(", "),
        };
        if let Err(e) = recommendation_queries::insert(pool, &record).await {
            warn!("Failed to log recommendation: {}", e);
        }
    }

    Ok(Json(RecommendResponse {
        age,
        goal: request.goal,
        asset_allocation,
        stock_suggestions,
        mutual_fund_suggestions,
        travel_suggestions,
        savings_tips,
    }))
}
