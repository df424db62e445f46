use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::Utc;
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{RecommendationParams, RecommendationResponse},
    routes::AppState,
};

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<RecommendationParams>,
) -> AppResult<Json<RecommendationResponse>> {
    let request = params.into_request(Utc::now().date_naive(), &state.limits);

    tracing::info!(
        request_id = %request_id,
        strategy = %request.strategy.kind(),
        limit = request.limit,
        "Processing recommendation request"
    );

    let response = state.engine.recommend(request).await?;

    tracing::info!(
        request_id = %request_id,
        count = response.recommendations.len(),
        "Recommendations completed"
    );

    Ok(Json(response))
}
