use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::sync::Arc;

use vocalis_types::{NewExchange, ProcessRequest, ProcessResponse};

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

/// Generate a reply for transcribed text and store the exchange
///
/// Malformed bodies are treated like a missing `text` field.
#[utoipa::path(
    post,
    path = "/process",
    request_body = ProcessRequest,
    responses(
        (status = 200, description = "Reply generated and stored", body = ProcessResponse),
        (status = 400, description = "Missing or empty text", body = vocalis_types::ErrorResponse),
        (status = 500, description = "Exchange could not be stored", body = vocalis_types::ErrorResponse)
    ),
    tag = "conversation"
)]
pub async fn process_text(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ProcessRequest>, JsonRejection>,
) -> ApiResult<Json<ProcessResponse>> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected /process body");
            return Err(ApiError::no_text());
        }
    };

    let text = request.trimmed_text().ok_or_else(ApiError::no_text)?;

    let reply = state.generator.generate_reply(text).await;

    let stored = state
        .store
        .insert(NewExchange::new(text, reply.clone()))
        .await?;
    tracing::info!(exchange_id = stored.id, "Exchange stored");

    Ok(Json(ProcessResponse { reply }))
}
