use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemorySettingsStore};
use crate::routes::with_screening_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use recruit_ai::config::AppConfig;
use recruit_ai::error::AppError;
use recruit_ai::telemetry;
use recruit_ai::workflows::screening::{
    QualificationCriteria, RecruitmentSettings, ScreeningWorkflow,
};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    // Shared so delivered addresses are remembered across run requests.
    let workflow = Arc::new(ScreeningWorkflow::from_config(
        &config,
        QualificationCriteria::default(),
    )?);
    let settings = Arc::new(InMemorySettingsStore::with_settings(
        RecruitmentSettings::default(),
    ));

    let app = with_screening_routes(workflow, settings)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "recruitment automation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
