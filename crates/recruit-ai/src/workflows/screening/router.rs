use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tracing::error;

use super::settings::{RecruitmentSettings, SettingsError, SettingsStore};
use super::workflow::{ScreeningRunError, ScreeningWorkflow};

/// Shared handles for the screening endpoints.
pub struct ScreeningState<S> {
    pub workflow: Arc<ScreeningWorkflow>,
    pub settings: Arc<S>,
}

impl<S> Clone for ScreeningState<S> {
    fn clone(&self) -> Self {
        Self {
            workflow: Arc::clone(&self.workflow),
            settings: Arc::clone(&self.settings),
        }
    }
}

/// Router exposing the bot settings and an on-demand screening run.
pub fn screening_router<S>(workflow: Arc<ScreeningWorkflow>, settings: Arc<S>) -> Router
where
    S: SettingsStore + 'static,
{
    Router::new()
        .route(
            "/api/recruitment-bot/settings",
            get(get_settings_handler::<S>).put(put_settings_handler::<S>),
        )
        .route("/api/v1/screening/run", post(run_handler::<S>))
        .with_state(ScreeningState { workflow, settings })
}

pub(crate) async fn get_settings_handler<S>(State(state): State<ScreeningState<S>>) -> Response
where
    S: SettingsStore + 'static,
{
    match state.settings.load() {
        Ok(settings) => (StatusCode::OK, axum::Json(settings)).into_response(),
        Err(err) => settings_error_response(err),
    }
}

pub(crate) async fn put_settings_handler<S>(
    State(state): State<ScreeningState<S>>,
    axum::Json(settings): axum::Json<RecruitmentSettings>,
) -> Response
where
    S: SettingsStore + 'static,
{
    let settings = settings.normalized();
    let stored = settings
        .validate()
        .and_then(|()| state.settings.save(settings));

    match stored {
        Ok(stored) => (StatusCode::OK, axum::Json(stored)).into_response(),
        Err(err) => settings_error_response(err),
    }
}

pub(crate) async fn run_handler<S>(State(state): State<ScreeningState<S>>) -> Response
where
    S: SettingsStore + 'static,
{
    let settings = match state.settings.load() {
        Ok(settings) => settings,
        Err(err) => return settings_error_response(err),
    };

    match state.workflow.run(&settings).await {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(err) => {
            error!(error = %err, "screening run failed");
            let status = match err {
                ScreeningRunError::Fetch(_) => StatusCode::BAD_GATEWAY,
                ScreeningRunError::Config(_) | ScreeningRunError::Client(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            let payload = json!({ "error": err.to_string() });
            (status, axum::Json(payload)).into_response()
        }
    }
}

fn settings_error_response(err: SettingsError) -> Response {
    let status = match err {
        SettingsError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SettingsError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
