use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use recruit_ai::config::AppConfig;
use recruit_ai::workflows::screening::{
    screening_router, ApplicationSource, DeliveryMode, EmailMessage, NotificationGateway,
    NotifyError, QualificationCriteria, RecruitmentSettings, ScreeningRunError, ScreeningWorkflow,
    SettingsError, SettingsStore, SourceError,
};
use serde_json::{json, Value};
use tower::ServiceExt;

struct StaticPortal {
    records: Result<Vec<Value>, u16>,
}

#[async_trait]
impl ApplicationSource for StaticPortal {
    async fn fetch_applications(&self) -> Result<Vec<Value>, SourceError> {
        self.records
            .clone()
            .map_err(|status| SourceError::Status { status })
    }
}

/// Serves one snapshot per fetch and keeps repeating the last one.
struct GrowingPortal {
    snapshots: Vec<Vec<Value>>,
    calls: AtomicUsize,
}

#[async_trait]
impl ApplicationSource for GrowingPortal {
    async fn fetch_applications(&self) -> Result<Vec<Value>, SourceError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let index = call.min(self.snapshots.len().saturating_sub(1));
        Ok(self.snapshots.get(index).cloned().unwrap_or_default())
    }
}

#[derive(Default)]
struct RecordingHr {
    reject: Vec<String>,
    emails: Mutex<Vec<String>>,
    batches: Mutex<Vec<Vec<String>>>,
}

#[async_trait]
impl NotificationGateway for RecordingHr {
    async fn send_email(&self, message: &EmailMessage) -> Result<u16, NotifyError> {
        self.emails
            .lock()
            .expect("email mutex")
            .push(message.email.clone());
        if self.reject.contains(&message.email) {
            Ok(500)
        } else {
            Ok(200)
        }
    }

    async fn send_batch(&self, emails: &[String]) -> Result<u16, NotifyError> {
        self.batches
            .lock()
            .expect("batch mutex")
            .push(emails.to_vec());
        Ok(200)
    }
}

#[derive(Default)]
struct MemorySettings {
    current: Mutex<RecruitmentSettings>,
}

impl SettingsStore for MemorySettings {
    fn load(&self) -> Result<RecruitmentSettings, SettingsError> {
        Ok(self.current.lock().expect("settings mutex").clone())
    }

    fn save(&self, settings: RecruitmentSettings) -> Result<RecruitmentSettings, SettingsError> {
        *self.current.lock().expect("settings mutex") = settings.clone();
        Ok(settings)
    }
}

fn portal_records() -> Vec<Value> {
    vec![
        json!({ "skills": ["Python", "Django", "APIs"], "experience": 3, "email": "a@x.com" }),
        json!({ "skills": ["Python"], "experience": 5, "email": "b@x.com" }),
        json!({ "skills": ["APIs", "Django", "Python", "Go"], "experience": 2, "email": "c@x.com" }),
        json!({ "experience": 9, "email": "broken@x.com" }),
        json!({ "skills": ["Python", "Django", "APIs"], "experience": 10, "email": "d@x.com" }),
    ]
}

fn workflow(
    records: Result<Vec<Value>, u16>,
    hr: Arc<RecordingHr>,
    mode: DeliveryMode,
) -> ScreeningWorkflow {
    ScreeningWorkflow::new(
        Arc::new(StaticPortal { records }),
        hr,
        QualificationCriteria::default(),
        mode,
    )
}

#[tokio::test]
async fn qualifies_scenario_and_notifies_in_one_batch() {
    let hr = Arc::new(RecordingHr::default());
    let records = vec![
        json!({ "skills": ["Python", "Django", "APIs"], "experience": 3, "email": "a@x.com" }),
        json!({ "skills": ["Python"], "experience": 5, "email": "b@x.com" }),
    ];
    let workflow = workflow(Ok(records), hr.clone(), DeliveryMode::Batch);

    let summary = workflow
        .run(&RecruitmentSettings::default())
        .await
        .expect("run succeeds");

    assert_eq!(summary.fetched, 2);
    assert_eq!(summary.qualified, 1);
    assert_eq!(summary.rejected, 1);
    assert_eq!(summary.notified, 1);
    assert_eq!(summary.delivered, vec!["a@x.com"]);
    assert_eq!(
        hr.batches.lock().expect("batch mutex").as_slice(),
        &[vec!["a@x.com".to_string()]]
    );
}

#[tokio::test]
async fn reruns_fetch_fresh_applications_and_skip_delivered_addresses() {
    let hr = Arc::new(RecordingHr::default());
    let first = vec![
        json!({ "skills": ["Python", "Django", "APIs"], "experience": 3, "email": "a@x.com" }),
    ];
    let mut second = first.clone();
    second.push(
        json!({ "skills": ["Python", "Django", "APIs"], "experience": 4, "email": "new@x.com" }),
    );
    let portal = Arc::new(GrowingPortal {
        snapshots: vec![first, second],
        calls: AtomicUsize::new(0),
    });
    let workflow = ScreeningWorkflow::new(
        portal.clone(),
        hr.clone(),
        QualificationCriteria::default(),
        DeliveryMode::Batch,
    );

    let settings = RecruitmentSettings::default();
    workflow.run(&settings).await.expect("first run");
    let rerun = workflow.run(&settings).await.expect("second run");

    assert_eq!(portal.calls.load(Ordering::SeqCst), 2);
    assert_eq!(rerun.fetched, 2);
    assert_eq!(rerun.already_notified, 1);
    assert_eq!(rerun.delivered, vec!["new@x.com"]);
    assert_eq!(
        hr.batches.lock().expect("batch mutex").as_slice(),
        &[vec!["a@x.com".to_string()], vec!["new@x.com".to_string()]]
    );
}

#[tokio::test]
async fn failed_deliveries_are_retried_on_the_next_run() {
    let hr = Arc::new(RecordingHr {
        reject: vec!["c@x.com".to_string()],
        ..RecordingHr::default()
    });
    let workflow = workflow(Ok(portal_records()), hr.clone(), DeliveryMode::PerCandidate);

    let settings = RecruitmentSettings::default();
    workflow.run(&settings).await.expect("first run");
    let rerun = workflow.run(&settings).await.expect("second run");

    assert_eq!(rerun.already_notified, 2);
    assert_eq!(rerun.failed(), 1);
    assert_eq!(
        *hr.emails.lock().expect("email mutex"),
        vec!["a@x.com", "c@x.com", "d@x.com", "c@x.com"]
    );
}

#[tokio::test]
async fn per_candidate_failures_are_isolated_and_malformed_records_skipped() {
    let hr = Arc::new(RecordingHr {
        reject: vec!["a@x.com".to_string()],
        ..RecordingHr::default()
    });
    let workflow = workflow(Ok(portal_records()), hr.clone(), DeliveryMode::PerCandidate);

    let summary = workflow
        .run(&RecruitmentSettings::default())
        .await
        .expect("run succeeds");

    assert_eq!(summary.malformed, 1);
    assert_eq!(summary.qualified, 3);
    assert_eq!(summary.notified, 2);
    assert_eq!(summary.failed(), 1);
    assert_eq!(summary.failures[0].email, "a@x.com");
    assert_eq!(
        *hr.emails.lock().expect("email mutex"),
        vec!["a@x.com", "c@x.com", "d@x.com"]
    );
    assert!(summary.summary_line().contains("1 skipped (malformed)"));
}

#[tokio::test]
async fn settings_cap_and_disable_notifications() {
    let hr = Arc::new(RecordingHr::default());
    let workflow = workflow(Ok(portal_records()), hr.clone(), DeliveryMode::PerCandidate);

    let capped = workflow
        .run(&RecruitmentSettings {
            maximum_candidates: 2,
            ..RecruitmentSettings::default()
        })
        .await
        .expect("capped run");
    assert_eq!(capped.notified, 2);
    assert_eq!(capped.deferred, 1);

    let disabled = workflow
        .run(&RecruitmentSettings {
            maximum_candidates: 10,
            auto_screening_enabled: false,
            ..RecruitmentSettings::default()
        })
        .await
        .expect("disabled run");
    assert_eq!(disabled.notified, 0);
    assert_eq!(disabled.already_notified, 2);
    assert_eq!(disabled.deferred, 1);
    assert_eq!(hr.emails.lock().expect("email mutex").len(), 2);
}

#[tokio::test]
async fn fetch_failure_aborts_before_notifying() {
    let hr = Arc::new(RecordingHr::default());
    let workflow = workflow(Err(401), hr.clone(), DeliveryMode::Batch);

    let err = workflow
        .run(&RecruitmentSettings::default())
        .await
        .expect_err("fetch fails");

    assert!(matches!(
        err,
        ScreeningRunError::Fetch(SourceError::Status { status: 401 })
    ));
    assert!(hr.batches.lock().expect("batch mutex").is_empty());
}

#[test]
fn missing_api_key_fails_before_any_request() {
    let config = AppConfig::from_lookup(|key| match key {
        "HR_SOFTWARE_API_KEY" => Some("hr-key".to_string()),
        _ => None,
    })
    .expect("config loads");

    let err = ScreeningWorkflow::from_config(&config, QualificationCriteria::default())
        .expect_err("portal key missing");
    assert!(matches!(err, ScreeningRunError::Config(_)));
}

#[tokio::test]
async fn dry_run_needs_only_the_portal_key_and_notifies_nobody() {
    let config = AppConfig::from_lookup(|key| match key {
        "JOB_PORTAL_API_KEY" => Some("portal-key".to_string()),
        _ => None,
    })
    .expect("config loads");

    assert!(ScreeningWorkflow::from_config(&config, QualificationCriteria::default()).is_err());
    ScreeningWorkflow::dry_run_from_config(&config, QualificationCriteria::default())
        .expect("dry run builds without the HR key");

    let workflow = ScreeningWorkflow::qualify_only(
        Arc::new(StaticPortal {
            records: Ok(portal_records()),
        }),
        QualificationCriteria::default(),
    );
    let summary = workflow
        .run(&RecruitmentSettings::default())
        .await
        .expect("qualify-only run");
    assert_eq!(summary.qualified, 3);
    assert_eq!(summary.notified, 0);
    assert_eq!(summary.deferred, 3);
}

#[tokio::test]
async fn summary_line_is_produced_when_nobody_qualifies() {
    let hr = Arc::new(RecordingHr::default());
    let records = vec![json!({ "skills": ["Go"], "experience": 1, "email": "z@x.com" })];
    let workflow = workflow(Ok(records), hr.clone(), DeliveryMode::Batch);

    let summary = workflow
        .run(&RecruitmentSettings::default())
        .await
        .expect("run succeeds");

    assert_eq!(summary.qualified, 0);
    assert!(summary
        .summary_line()
        .starts_with("screening: 1 fetched, 0 qualified"));
    assert!(hr.batches.lock().expect("batch mutex").is_empty());
}

#[tokio::test]
async fn router_updates_settings_and_runs_screening() {
    let hr = Arc::new(RecordingHr::default());
    let workflow = Arc::new(workflow(Ok(portal_records()), hr.clone(), DeliveryMode::Batch));
    let settings = Arc::new(MemorySettings::default());
    let app = screening_router(workflow, settings.clone());

    let invalid = Request::builder()
        .method("PUT")
        .uri("/api/recruitment-bot/settings")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "maximumCandidates": 0, "autoScreeningEnabled": true }).to_string(),
        ))
        .expect("request builds");
    let response = app.clone().oneshot(invalid).await.expect("router responds");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let update = Request::builder()
        .method("PUT")
        .uri("/api/recruitment-bot/settings")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "maximumCandidates": 1, "autoScreeningEnabled": true }).to_string(),
        ))
        .expect("request builds");
    let response = app.clone().oneshot(update).await.expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(settings.load().expect("settings").maximum_candidates, 1);

    let run = Request::builder()
        .method("POST")
        .uri("/api/v1/screening/run")
        .body(Body::empty())
        .expect("request builds");
    let response = app.oneshot(run).await.expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    let body: Value = serde_json::from_slice(&bytes).expect("json body");
    assert_eq!(body["notified"], 1);
    assert_eq!(body["deferred"], 2);
    assert_eq!(
        hr.batches.lock().expect("batch mutex").as_slice(),
        &[vec!["a@x.com".to_string()]]
    );
}

fn run_request() -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/screening/run")
        .body(Body::empty())
        .expect("request builds")
}

#[tokio::test]
async fn repeated_run_requests_send_a_single_batch() {
    let hr = Arc::new(RecordingHr::default());
    let workflow = Arc::new(workflow(Ok(portal_records()), hr.clone(), DeliveryMode::Batch));
    let app = screening_router(workflow, Arc::new(MemorySettings::default()));

    let first = app.clone().oneshot(run_request()).await.expect("router responds");
    assert_eq!(first.status(), StatusCode::OK);

    let second = app.oneshot(run_request()).await.expect("router responds");
    assert_eq!(second.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(second.into_body(), usize::MAX)
        .await
        .expect("body reads");
    let body: Value = serde_json::from_slice(&bytes).expect("json body");
    assert_eq!(body["notified"], 0);
    assert_eq!(body["already_notified"], 3);

    assert_eq!(
        hr.batches.lock().expect("batch mutex").as_slice(),
        &[vec![
            "a@x.com".to_string(),
            "c@x.com".to_string(),
            "d@x.com".to_string()
        ]]
    );
}

#[tokio::test]
async fn settings_endpoint_rejects_inverted_thresholds() {
    let hr = Arc::new(RecordingHr::default());
    let workflow = Arc::new(workflow(Ok(portal_records()), hr, DeliveryMode::Batch));
    let settings = Arc::new(MemorySettings::default());
    let app = screening_router(workflow, settings.clone());

    let put = |body: Value| {
        Request::builder()
            .method("PUT")
            .uri("/api/recruitment-bot/settings")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request builds")
    };

    let inverted = put(json!({
        "maximumCandidates": 5,
        "autoScreeningEnabled": true,
        "autoResponseThreshold": 1,
        "autoRejectionThreshold": 4
    }));
    let response = app.clone().oneshot(inverted).await.expect("router responds");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let valid = put(json!({
        "maximumCandidates": 5,
        "autoScreeningEnabled": true,
        "jobTitles": ["Developer", " "],
        "keywords": [" Rust ", "SQL"],
        "autoResponseThreshold": 4,
        "autoRejectionThreshold": 1
    }));
    let response = app.oneshot(valid).await.expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);

    let stored = settings.load().expect("settings");
    assert_eq!(stored.job_titles, vec!["Developer"]);
    assert_eq!(stored.keywords, vec!["Rust", "SQL"]);
    assert_eq!(stored.auto_response_threshold, 4.0);
}
