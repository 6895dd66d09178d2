//! API endpoint settings: validation, persistence, and the coordinator that
//! owns the live configuration.
//!
//! The coordinator is the only component allowed to mutate the active
//! configuration. Applying new settings validates first, persists second,
//! reconfigures the metrics provider third, and only then swaps the active
//! copy — a rejected apply leaves everything as it was.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::{CoreError, SettingsError};
use crate::provider::MetricsProvider;

const FILE_NAME: &str = "settings.json";

/// API endpoint configuration entered by the user.
///
/// The port is kept as a string because it arrives from a text field; it is
/// validated to be all ASCII digits before use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSettings {
    pub api_url: String,
    pub api_port: String,
    #[serde(default)]
    pub api_key: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            api_url: "http://localhost".to_string(),
            api_port: "8080".to_string(),
            api_key: String::new(),
        }
    }
}

impl ApiSettings {
    /// Reject an empty address or a port that is empty or not all digits.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.api_url.trim().is_empty() {
            return Err(SettingsError::EmptyAddress);
        }
        if self.api_port.is_empty() || !self.api_port.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SettingsError::InvalidPort(self.api_port.clone()));
        }
        Ok(())
    }
}

/// Abstract persistent settings store.
///
/// `load` returns `None` when no settings have been saved yet; callers fall
/// back to [`ApiSettings::default`].
#[async_trait::async_trait]
pub trait SettingsStore: Send + Sync {
    async fn load(&self) -> Result<Option<ApiSettings>, CoreError>;
    async fn save(&self, settings: &ApiSettings) -> Result<(), CoreError>;
}

/// JSON-file settings store.
///
/// On an unparseable file the corrupt content is backed up next to the
/// original and `load` reports "no settings" so the caller resets to
/// defaults instead of failing.
pub struct FileSettingsStore {
    file_path: PathBuf,
}

impl FileSettingsStore {
    /// Create a store rooted at the given config directory.
    pub fn new(config_dir: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let config_dir = config_dir.into();
        fs::create_dir_all(&config_dir)
            .map_err(|e| CoreError::Other(format!("Failed to create config directory: {e}")))?;
        Ok(Self {
            file_path: config_dir.join(FILE_NAME),
        })
    }
}

#[async_trait::async_trait]
impl SettingsStore for FileSettingsStore {
    async fn load(&self) -> Result<Option<ApiSettings>, CoreError> {
        if !self.file_path.exists() {
            return Ok(None);
        }

        let data = fs::read_to_string(&self.file_path)
            .map_err(|e| CoreError::Other(format!("Failed to read settings file: {e}")))?;

        match serde_json::from_str::<ApiSettings>(&data) {
            Ok(settings) => Ok(Some(settings)),
            Err(e) => {
                // Back up the corrupt file and reset to defaults.
                let backup_path = self.file_path.with_extension("json.bak");
                let _ = fs::copy(&self.file_path, &backup_path);
                warn!(
                    "Settings file is corrupt ({e}), backed up to {}",
                    backup_path.display()
                );
                Ok(None)
            }
        }
    }

    async fn save(&self, settings: &ApiSettings) -> Result<(), CoreError> {
        let data = serde_json::to_string_pretty(settings)
            .map_err(|e| CoreError::Other(format!("Failed to serialize settings: {e}")))?;
        fs::write(&self.file_path, data)
            .map_err(|e| CoreError::Other(format!("Failed to write settings file: {e}")))?;
        Ok(())
    }
}

/// Owns the authoritative API configuration.
pub struct SettingsCoordinator {
    store: Arc<dyn SettingsStore>,
    active: Mutex<ApiSettings>,
}

impl SettingsCoordinator {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self {
            store,
            active: Mutex::new(ApiSettings::default()),
        }
    }

    /// Snapshot of the currently active configuration.
    pub fn active(&self) -> ApiSettings {
        self.active.lock().unwrap().clone()
    }

    /// Load persisted settings into the active slot, falling back to the
    /// defaults when nothing is stored or loading fails.
    pub async fn load_active(&self) -> ApiSettings {
        let loaded = match self.store.load().await {
            Ok(Some(settings)) => settings,
            Ok(None) => ApiSettings::default(),
            Err(e) => {
                warn!("Failed to load settings, using defaults: {e}");
                ApiSettings::default()
            }
        };
        *self.active.lock().unwrap() = loaded.clone();
        loaded
    }

    /// Validate, persist, and activate new settings, reconfiguring the
    /// provider in the same step.
    ///
    /// On any error the previously active configuration stays in effect and
    /// the provider is left untouched.
    pub async fn apply(
        &self,
        new: ApiSettings,
        provider: &dyn MetricsProvider,
    ) -> Result<(), SettingsError> {
        new.validate()?;

        self.store
            .save(&new)
            .await
            .map_err(|e| SettingsError::StoreFailed(e.to_string()))?;

        provider
            .configure(&new.api_url, &new.api_port, &new.api_key)
            .await;

        info!("Applied new API settings: {}:{}", new.api_url, new.api_port);
        *self.active.lock().unwrap() = new;
        Ok(())
    }
}
