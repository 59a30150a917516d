// HTTP request handlers
use crate::application::error::DashboardError;
use crate::domain::series::Selection;
use crate::infrastructure::chunked_json::stream_from_receiver;
use crate::infrastructure::json_mapper::{
    comparison_to_dto, detail_to_dto, entity_to_dto, overview_to_dto, regression_to_dto,
    ComparisonDto, DetailDto, EntityDto, OverviewDto, RegressionDto,
};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub hours: Option<u32>,
    pub samples: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CompareQuery {
    /// Comma separated entity names, in legend order
    pub entities: Option<String>,
    /// Entity to flip in or out of `entities`
    pub toggle: Option<String>,
    pub hours: Option<u32>,
    pub samples: Option<u32>,
}

impl CompareQuery {
    fn selection(&self) -> Selection {
        let names = self
            .entities
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty());
        let mut selection = Selection::from_names(names);
        if let Some(name) = self.toggle.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            selection.toggle(name);
        }
        selection
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = match &self {
            DashboardError::InvalidWindow { .. } | DashboardError::InvalidDensity(_) => {
                StatusCode::BAD_REQUEST
            }
            DashboardError::UnknownEntity(_) => StatusCode::NOT_FOUND,
            DashboardError::SeriesUnavailable { source, .. } => {
                tracing::warn!("{}: {:#}", self, source);
                StatusCode::SERVICE_UNAVAILABLE
            }
        };
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, DashboardError>;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// List the entity catalog
pub async fn list_entities(State(state): State<Arc<AppState>>) -> Json<Vec<EntityDto>> {
    let entities = state
        .catalog_service
        .list_entities()
        .iter()
        .map(entity_to_dto)
        .collect();
    Json(entities)
}

/// Overview cards for every entity
pub async fn overview(
    Query(query): Query<RangeQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<OverviewDto> {
    let service = &state.dashboard_service;
    let window = service.resolve_window(query.hours, query.samples)?;
    let overview = service.overview(window).await?;
    Ok(Json(overview_to_dto(overview)))
}

/// Overview cards streamed as NDJSON while each series resolves
pub async fn stream_overview(
    Query(query): Query<RangeQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let window = match state.dashboard_service.resolve_window(query.hours, query.samples) {
        Ok(window) => window,
        Err(e) => return e.into_response(),
    };

    let rx = state.streaming_service.stream_overview(window).await;
    stream_from_receiver(rx).into_response()
}

/// Series and trend for one entity
pub async fn entity_detail(
    Path(name): Path<String>,
    Query(query): Query<RangeQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<DetailDto> {
    let service = &state.dashboard_service;
    let window = service.resolve_window(query.hours, query.samples)?;
    let view = service.detail(&name, window).await?;
    Ok(Json(detail_to_dto(view)))
}

/// Raw series with its least-squares overlay
pub async fn entity_regression(
    Path(name): Path<String>,
    Query(query): Query<RangeQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<RegressionDto> {
    let service = &state.dashboard_service;
    let window = service.resolve_window(query.hours, query.samples)?;
    let view = service.regression(&name, window).await?;
    Ok(Json(regression_to_dto(view)))
}

/// Positionally merged table of the selected entities
pub async fn compare(
    Query(query): Query<CompareQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<ComparisonDto> {
    let service = &state.dashboard_service;
    let window = service.resolve_window(query.hours, query.samples)?;
    let view = service.compare(&query.selection(), window).await?;
    Ok(Json(comparison_to_dto(view)))
}
