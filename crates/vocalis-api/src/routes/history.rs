use axum::{extract::State, Json};
use std::sync::Arc;

use vocalis_types::HistoryResponse;

use crate::{error::ApiResult, state::AppState};

/// Most recent exchanges, oldest first
#[utoipa::path(
    get,
    path = "/history",
    responses(
        (status = 200, description = "Most recent exchanges in chronological order", body = HistoryResponse),
        (status = 500, description = "Store unavailable", body = vocalis_types::ErrorResponse)
    ),
    tag = "conversation"
)]
pub async fn get_history(State(state): State<Arc<AppState>>) -> ApiResult<Json<HistoryResponse>> {
    let messages = state.store.recent(state.config.history.limit).await?;
    Ok(Json(HistoryResponse { messages }))
}
