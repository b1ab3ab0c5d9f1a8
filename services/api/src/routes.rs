use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use recruit_ai::workflows::resumes::{KeywordAnalyzer, KeywordCounts};
use recruit_ai::workflows::screening::{screening_router, ScreeningWorkflow, SettingsStore};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct KeywordAnalysisRequest {
    pub(crate) text: String,
    #[serde(default)]
    pub(crate) keywords: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct KeywordAnalysisResponse {
    pub(crate) distinct_keywords: usize,
    pub(crate) keyword_counts: KeywordCounts,
}

pub(crate) fn with_screening_routes<S>(
    workflow: Arc<ScreeningWorkflow>,
    settings: Arc<S>,
) -> axum::Router
where
    S: SettingsStore + 'static,
{
    screening_router(workflow, Arc::clone(&settings))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/resumes/analyze",
            axum::routing::post(keyword_analysis_endpoint::<S>),
        )
        .layer(Extension(settings))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Request keywords win, then the configured bot keywords, then the defaults.
pub(crate) async fn keyword_analysis_endpoint<S>(
    Extension(settings): Extension<Arc<S>>,
    Json(payload): Json<KeywordAnalysisRequest>,
) -> Result<Json<KeywordAnalysisResponse>, (StatusCode, Json<serde_json::Value>)>
where
    S: SettingsStore + 'static,
{
    let keywords = match payload.keywords {
        Some(keywords) if !keywords.is_empty() => Some(keywords),
        _ => settings
            .load()
            .map_err(|err| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": err.to_string() })),
                )
            })?
            .resume_keywords()
            .map(<[String]>::to_vec),
    };
    let analyzer = keywords.map(KeywordAnalyzer::new).unwrap_or_default();

    let keyword_counts = analyzer.analyze(&payload.text);
    Ok(Json(KeywordAnalysisResponse {
        distinct_keywords: keyword_counts.len(),
        keyword_counts,
    }))
}
