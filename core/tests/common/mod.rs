//! Shared test doubles for the sync-engine scenario tests.
//!
//! `ScriptedProvider` plays back pre-programmed responses (optionally after a
//! virtual-time delay, for completion-order scenarios) and counts calls per
//! endpoint. `MemoryStore` is an in-memory settings store.

// Each integration test is compiled as its own crate, so not every test file
// uses every helper from this shared module.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use fleetpulse_core::errors::{CoreError, FetchError};
use fleetpulse_core::provider::MetricsProvider;
use fleetpulse_core::settings::{ApiSettings, SettingsStore};
use fleetpulse_core::types::{
    Disk, Host, HostDetail, HostStatus, MetricSample, NetworkInterface, Process, SortKey,
};

/// Build a minimal online host.
pub fn host(id: &str, name: &str) -> Host {
    Host {
        id: id.to_string(),
        name: name.to_string(),
        ip: "10.0.0.1".to_string(),
        status: HostStatus::Online,
        os: "Ubuntu 22.04".to_string(),
        location: "eu-west".to_string(),
        last_heartbeat: None,
        current_metrics: None,
    }
}

/// Build a metric sample with a recognizable cpu value.
pub fn sample(timestamp: &str, cpu: f64) -> MetricSample {
    MetricSample {
        timestamp: timestamp.to_string(),
        cpu,
        ..Default::default()
    }
}

fn default_detail(id: &str) -> HostDetail {
    HostDetail {
        id: id.to_string(),
        name: format!("host {id}"),
        ip: "10.0.0.1".to_string(),
        status: HostStatus::Online,
        os: "Ubuntu 22.04".to_string(),
        location: "eu-west".to_string(),
        metrics: Default::default(),
        info: Default::default(),
    }
}

/// Metrics provider playing back scripted responses.
///
/// Scripts are consumed front to back, one entry per call. An exhausted
/// script yields a transport error so a test that advances time too far
/// fails loudly instead of fabricating data.
pub struct ScriptedProvider {
    pub configured: Mutex<Vec<(String, String, String)>>,
    pub list_script: Mutex<VecDeque<Result<Vec<Host>, FetchError>>>,
    /// (virtual delay, response) pairs for the history endpoint.
    pub history_script: Mutex<VecDeque<(Duration, Vec<MetricSample>)>>,
    pub interfaces: Mutex<Vec<NetworkInterface>>,
    pub disks: Mutex<Vec<Disk>>,
    pub processes: Mutex<Vec<Process>>,
    pub list_calls: AtomicUsize,
    pub detail_calls: AtomicUsize,
    pub history_calls: AtomicUsize,
    pub network_calls: AtomicUsize,
    pub disk_calls: AtomicUsize,
    pub process_calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self {
            configured: Mutex::new(Vec::new()),
            list_script: Mutex::new(VecDeque::new()),
            history_script: Mutex::new(VecDeque::new()),
            interfaces: Mutex::new(Vec::new()),
            disks: Mutex::new(Vec::new()),
            processes: Mutex::new(Vec::new()),
            list_calls: AtomicUsize::new(0),
            detail_calls: AtomicUsize::new(0),
            history_calls: AtomicUsize::new(0),
            network_calls: AtomicUsize::new(0),
            disk_calls: AtomicUsize::new(0),
            process_calls: AtomicUsize::new(0),
        }
    }

    pub fn push_list(&self, response: Result<Vec<Host>, FetchError>) {
        self.list_script.lock().unwrap().push_back(response);
    }

    pub fn push_history(&self, delay: Duration, response: Vec<MetricSample>) {
        self.history_script
            .lock()
            .unwrap()
            .push_back((delay, response));
    }

    fn exhausted() -> FetchError {
        FetchError::Transport("script exhausted".to_string())
    }
}

#[async_trait::async_trait]
impl MetricsProvider for ScriptedProvider {
    async fn configure(&self, address: &str, port: &str, credential: &str) {
        self.configured.lock().unwrap().push((
            address.to_string(),
            port.to_string(),
            credential.to_string(),
        ));
    }

    async fn list_hosts(&self) -> Result<Vec<Host>, FetchError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.list_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Self::exhausted()))
    }

    async fn host_detail(&self, id: &str) -> Result<HostDetail, FetchError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        Ok(default_detail(id))
    }

    async fn host_history(
        &self,
        _id: &str,
        _duration: &str,
    ) -> Result<Vec<MetricSample>, FetchError> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        let entry = self.history_script.lock().unwrap().pop_front();
        match entry {
            Some((delay, response)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Ok(response)
            }
            None => Ok(Vec::new()),
        }
    }

    async fn disks(&self, _id: &str) -> Result<Vec<Disk>, FetchError> {
        self.disk_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.disks.lock().unwrap().clone())
    }

    async fn processes(
        &self,
        _id: &str,
        _sort: SortKey,
        _limit: usize,
    ) -> Result<Vec<Process>, FetchError> {
        self.process_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.processes.lock().unwrap().clone())
    }

    async fn network_interfaces(&self, _id: &str) -> Result<Vec<NetworkInterface>, FetchError> {
        self.network_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.interfaces.lock().unwrap().clone())
    }
}

/// In-memory settings store.
pub struct MemoryStore {
    pub stored: Mutex<Option<ApiSettings>>,
    pub fail_save: Mutex<bool>,
}

impl MemoryStore {
    pub fn empty() -> Self {
        Self {
            stored: Mutex::new(None),
            fail_save: Mutex::new(false),
        }
    }

    pub fn with(settings: ApiSettings) -> Self {
        Self {
            stored: Mutex::new(Some(settings)),
            fail_save: Mutex::new(false),
        }
    }
}

#[async_trait::async_trait]
impl SettingsStore for MemoryStore {
    async fn load(&self) -> Result<Option<ApiSettings>, CoreError> {
        Ok(self.stored.lock().unwrap().clone())
    }

    async fn save(&self, settings: &ApiSettings) -> Result<(), CoreError> {
        if *self.fail_save.lock().unwrap() {
            return Err(CoreError::Other("store unavailable".to_string()));
        }
        *self.stored.lock().unwrap() = Some(settings.clone());
        Ok(())
    }
}
