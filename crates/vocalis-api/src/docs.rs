use utoipa::OpenApi;
use vocalis_types::{ErrorResponse, Exchange, HistoryResponse, ProcessRequest, ProcessResponse};

use crate::routes::{health, history, process};

#[derive(OpenApi)]
#[openapi(
    paths(process::process_text, history::get_history, health::health_check),
    components(schemas(
        ProcessRequest,
        ProcessResponse,
        HistoryResponse,
        Exchange,
        ErrorResponse,
        health::HealthResponse
    )),
    tags(
        (name = "conversation", description = "Voice exchange round trip"),
        (name = "health", description = "Service status")
    )
)]
pub struct ApiDoc;
