use axum::{extract::State, Json};
use utoipa::OpenApi;

use super::{
    dto::{ChatReply, ChatRequest, HealthDto, MeasurementDto, QueryFilters, StatsDto},
    errors::AppError,
    AppState,
};
use crate::chat::RECENT_MEASUREMENT_LIMIT;

/// Service health blob.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service is up", body = HealthDto),
    ),
    tag = "meta"
)]
pub async fn get_health() -> Json<HealthDto> {
    Json(HealthDto {
        status: "online",
        service: "FloatChat API",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Answer a chat message with model-generated text grounded in the dataset.
///
/// Always 200 with some reply text for a well-formed body; backend outages
/// degrade into a fixed apology string instead of an error status.
#[utoipa::path(
    post,
    path = "/api/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Generated (or fallback) reply", body = ChatReply),
        (status = 500, description = "Measurement store unavailable"),
    ),
    tag = "chat"
)]
pub async fn post_chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ChatReply>, AppError> {
    let completion = state.chat.respond(body.message.trim()).await?;
    Ok(Json(ChatReply {
        reply: completion.text().to_owned(),
    }))
}

/// Aggregate statistics over the whole measurement table.
#[utoipa::path(
    get,
    path = "/api/data/stats",
    responses(
        (status = 200, description = "Dataset statistics", body = StatsDto),
        (status = 500, description = "Measurement store unavailable"),
    ),
    tag = "data"
)]
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsDto>, AppError> {
    let stats = state.data.dataset_stats().await?;
    Ok(Json(stats.into()))
}

/// The most recent measurements, newest first (null timestamps last).
#[utoipa::path(
    get,
    path = "/api/data/recent",
    responses(
        (status = 200, description = "Recent measurements", body = Vec<MeasurementDto>),
        (status = 500, description = "Measurement store unavailable"),
    ),
    tag = "data"
)]
pub async fn get_recent(
    State(state): State<AppState>,
) -> Result<Json<Vec<MeasurementDto>>, AppError> {
    let rows = state.data.recent_measurements(RECENT_MEASUREMENT_LIMIT).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// Measurements matching the given filters, newest first (null timestamps
/// last).
#[utoipa::path(
    post,
    path = "/api/data/query",
    request_body = QueryFilters,
    responses(
        (status = 200, description = "Matching measurements", body = Vec<MeasurementDto>),
        (status = 500, description = "Measurement store unavailable"),
    ),
    tag = "data"
)]
pub async fn post_query(
    State(state): State<AppState>,
    Json(filters): Json<QueryFilters>,
) -> Result<Json<Vec<MeasurementDto>>, AppError> {
    let rows = state.data.query_measurements(&filters.into()).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

// ---------------------------------------------------------------------------
// OpenAPI spec struct (used in api/mod.rs)
// ---------------------------------------------------------------------------

#[derive(OpenApi)]
#[openapi(
    paths(get_health, post_chat, get_stats, get_recent, post_query),
    components(schemas(HealthDto, ChatRequest, ChatReply, StatsDto, MeasurementDto, QueryFilters)),
    tags(
        (name = "chat", description = "Conversational endpoint"),
        (name = "data", description = "Read-only measurement endpoints"),
        (name = "meta", description = "Service metadata"),
    ),
    info(
        title = "FloatChat API",
        version = "0.1.0",
        description = "Chat over ARGO float measurements"
    )
)]
pub struct ApiDoc;
