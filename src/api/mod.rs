pub mod dtos;
pub mod handlers;

use axum::{
    Router,
    http::HeaderName,
    routing::{get, post},
};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    analysis::{AnalysisReport, ReportSummary},
    app_state::AppState,
    extractor::{ImageSignal, KeywordStat, LinkSignal, SignalSet},
    health::{self, HealthResponse},
    recommender::{Priority, Recommendation, RuleId, ScoreImpact},
    screenshot::ScreenshotOutcome,
    scorer::{Category, Score},
};
use dtos::{AnalyzeRequest, ChatRequest, ChatResponse, ErrorResponse, HistoryItem};

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(OpenApi)]
#[openapi(
    info(title = "sitegrade", description = "Single-page on-page SEO analysis"),
    paths(
        health::health_check,
        handlers::analyze,
        handlers::list_history,
        handlers::get_history,
        handlers::relay,
        handlers::screenshot,
        handlers::chat,
    ),
    components(schemas(
        HealthResponse,
        AnalyzeRequest,
        AnalysisReport,
        ReportSummary,
        SignalSet,
        ImageSignal,
        LinkSignal,
        KeywordStat,
        Score,
        Category,
        Recommendation,
        Priority,
        RuleId,
        ScoreImpact,
        HistoryItem,
        ScreenshotOutcome,
        ChatRequest,
        ChatResponse,
        ErrorResponse,
    )),
    tags(
        (name = "health"),
        (name = "analysis", description = "Page analysis and recent history"),
        (name = "fetch", description = "Markup relay"),
        (name = "preview", description = "Page screenshots"),
        (name = "assistant", description = "SEO chat assistant"),
    )
)]
pub struct ApiDoc;

pub fn router(state: AppState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .route("/healthz", get(health::health_check))
        .route("/v1/analyze", post(handlers::analyze))
        .route("/v1/history", get(handlers::list_history))
        .route("/v1/history/{id}", get(handlers::get_history))
        .route("/v1/relay", get(handlers::relay))
        .route("/v1/screenshot", get(handlers::screenshot))
        .route("/v1/chat", post(handlers::chat))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
}
