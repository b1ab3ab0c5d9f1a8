use metrics_exporter_prometheus::PrometheusHandle;
use recruit_ai::workflows::screening::{RecruitmentSettings, SettingsError, SettingsStore};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, RwLock};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Settings live for the lifetime of the process only.
#[derive(Default, Clone)]
pub(crate) struct InMemorySettingsStore {
    settings: Arc<RwLock<RecruitmentSettings>>,
}

impl InMemorySettingsStore {
    pub(crate) fn with_settings(settings: RecruitmentSettings) -> Self {
        Self {
            settings: Arc::new(RwLock::new(settings)),
        }
    }
}

impl SettingsStore for InMemorySettingsStore {
    fn load(&self) -> Result<RecruitmentSettings, SettingsError> {
        self.settings
            .read()
            .map(|guard| guard.clone())
            .map_err(|_| SettingsError::Unavailable("settings lock poisoned".to_string()))
    }

    fn save(&self, settings: RecruitmentSettings) -> Result<RecruitmentSettings, SettingsError> {
        let mut guard = self
            .settings
            .write()
            .map_err(|_| SettingsError::Unavailable("settings lock poisoned".to_string()))?;
        *guard = settings.clone();
        Ok(settings)
    }
}
