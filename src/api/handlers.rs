use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tokio_util::sync::CancellationToken;
use tracing::warn;
use uuid::Uuid;

use crate::{
    analysis::{AnalysisReport, AnalyzeError},
    api::dtos::{AnalyzeRequest, ChatRequest, ChatResponse, ErrorResponse, HistoryItem, UrlQuery},
    app_state::AppState,
    chat::FALLBACK_REPLY,
    fetcher::{FetchError, is_private_target, normalize_url},
    screenshot::ScreenshotOutcome,
};

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(error))).into_response()
}

fn fetch_error_status(err: &FetchError) -> StatusCode {
    match err {
        FetchError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
        FetchError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for AnalyzeError {
    fn into_response(self) -> Response {
        match self {
            AnalyzeError::InvalidUrl(_) => error_response(StatusCode::BAD_REQUEST, self.to_string()),
            AnalyzeError::DomainNotFound { domain, reason } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse {
                    error: reason,
                    domain: Some(domain),
                }),
            )
                .into_response(),
            AnalyzeError::Fetch(ref err) => error_response(fetch_error_status(err), self.to_string()),
        }
    }
}

#[utoipa::path(
    post,
    path = "/v1/analyze",
    tag = "analysis",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Page analyzed", body = AnalysisReport),
        (status = 400, description = "Invalid URL", body = ErrorResponse),
        (status = 422, description = "Domain does not exist", body = ErrorResponse),
        (status = 502, description = "Page could not be fetched", body = ErrorResponse),
        (status = 504, description = "Fetch timed out", body = ErrorResponse)
    )
)]
pub async fn analyze(State(state): State<AppState>, Json(payload): Json<AnalyzeRequest>) -> Response {
    if let Err(error) = payload.validate() {
        return error_response(StatusCode::BAD_REQUEST, error);
    }

    // Dropping this handler (client gone) drops the in-flight fetch with it
    let cancel = CancellationToken::new();
    match state.analyzer.analyze(&payload.url, &cancel).await {
        Ok(report) => {
            state
                .history
                .record(report.signals.clone(), report.score)
                .await;
            Json(report).into_response()
        }
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/v1/history",
    tag = "analysis",
    responses(
        (status = 200, description = "Recent analyses, newest first", body = Vec<HistoryItem>)
    )
)]
pub async fn list_history(State(state): State<AppState>) -> Json<Vec<HistoryItem>> {
    let entries = state.history.list().await;
    Json(entries.iter().map(HistoryItem::from).collect())
}

#[utoipa::path(
    get,
    path = "/v1/history/{id}",
    tag = "analysis",
    params(("id" = Uuid, Path, description = "History entry id")),
    responses(
        (status = 200, description = "Stored analysis", body = AnalysisReport),
        (status = 404, description = "Unknown or evicted entry", body = ErrorResponse)
    )
)]
pub async fn get_history(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match state.history.get(id).await {
        Some(entry) => Json(state.analyzer.evaluate(entry.signals)).into_response(),
        None => error_response(StatusCode::NOT_FOUND, "Analysis not found"),
    }
}

#[utoipa::path(
    get,
    path = "/v1/relay",
    tag = "fetch",
    params(UrlQuery),
    responses(
        (status = 200, description = "Raw page markup", body = String, content_type = "text/html"),
        (status = 400, description = "Invalid URL", body = ErrorResponse),
        (status = 403, description = "Loopback or private-network target", body = ErrorResponse),
        (status = 502, description = "Upstream failure", body = ErrorResponse),
        (status = 504, description = "Upstream timed out", body = ErrorResponse)
    )
)]
pub async fn relay(State(state): State<AppState>, Query(query): Query<UrlQuery>) -> Response {
    if let Err(error) = query.validate() {
        return error_response(StatusCode::BAD_REQUEST, error);
    }
    let target = match normalize_url(&query.url) {
        Ok(url) => url,
        Err(err) => return error_response(StatusCode::BAD_REQUEST, err.to_string()),
    };
    if !state.relay_allow_private && is_private_target(&target) {
        warn!(url = %target, "relay refused private target");
        return error_response(StatusCode::FORBIDDEN, "Target address is not allowed");
    }

    let cancel = CancellationToken::new();
    match state.analyzer.fetcher().fetch_direct(&target, &cancel).await {
        Ok(page) => (
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            page.markup,
        )
            .into_response(),
        Err(err) => {
            warn!(url = %target, error = %err, "relay fetch failed");
            error_response(fetch_error_status(&err), err.to_string())
        }
    }
}

#[utoipa::path(
    get,
    path = "/v1/screenshot",
    tag = "preview",
    params(UrlQuery),
    responses(
        (status = 200, description = "Screenshot lookup result", body = ScreenshotOutcome),
        (status = 400, description = "Invalid URL", body = ErrorResponse)
    )
)]
pub async fn screenshot(State(state): State<AppState>, Query(query): Query<UrlQuery>) -> Response {
    if let Err(error) = query.validate() {
        return error_response(StatusCode::BAD_REQUEST, error);
    }
    match normalize_url(&query.url) {
        Ok(page) => Json(state.screenshots.capture(&page).await).into_response(),
        Err(err) => error_response(StatusCode::BAD_REQUEST, err.to_string()),
    }
}

#[utoipa::path(
    post,
    path = "/v1/chat",
    tag = "assistant",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Assistant reply, or a fallback apology on failure", body = ChatResponse),
        (status = 400, description = "Empty or oversized message", body = ErrorResponse),
        (status = 503, description = "Chat is not configured", body = ErrorResponse)
    )
)]
pub async fn chat(State(state): State<AppState>, Json(payload): Json<ChatRequest>) -> Response {
    let Some(assistant) = state.chat.as_ref() else {
        return error_response(StatusCode::SERVICE_UNAVAILABLE, "Chat is not configured");
    };
    if let Err(error) = payload.validate() {
        return error_response(StatusCode::BAD_REQUEST, error);
    }

    let reply = match assistant.reply(&payload.message).await {
        Ok(reply) => reply,
        Err(err) => {
            warn!(error = %err, "assistant request failed");
            FALLBACK_REPLY.to_string()
        }
    };
    Json(ChatResponse { reply }).into_response()
}
