//! Top-level composition of the sync engine.
//!
//! The orchestrator owns the host collection and every metric window, wires
//! settings changes through to the metrics provider, and scopes the pollers
//! to the view that needs them: entering a view starts its pollers, leaving
//! stops them and closes their fetch gates so late responses are discarded.
//! The presentation layer only ever sees read-only snapshots.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::errors::{CoreError, SettingsError};
use crate::navigator::{BackAction, Navigator, View};
use crate::poller::{
    FetchGate, ResourcePoller, DETAIL_INTERVAL, HOST_LIST_INTERVAL, NETWORK_INTERVAL,
    PROCESS_INTERVAL,
};
use crate::provider::{
    MetricsProvider, DETAIL_HISTORY_DURATION, PROCESS_LIMIT, PROCESS_SORT,
};
use crate::settings::{ApiSettings, SettingsCoordinator, SettingsStore};
use crate::types::{
    Disk, Host, HostDetail, HostStatus, MetricSample, NetworkInterface, Process,
};
use crate::window::{MetricWindow, HISTORY_CAP, SPARKLINE_CAP};

/// All data the presentation layer reads, mutated only by completed fetches.
struct FleetState {
    hosts: Vec<Host>,
    connection_error: bool,
    /// Whether any host-list fetch has ever succeeded. Gates the placeholder.
    had_success: bool,
    /// Per-host sparkline windows fed by the list poll (cap 8).
    sparklines: HashMap<String, MetricWindow>,
    /// Per-host history windows replaced by the detail poll (cap 20).
    history: HashMap<String, MetricWindow>,
    detail: Option<HostDetail>,
    disks: Vec<Disk>,
    processes: Vec<Process>,
    interfaces: Vec<NetworkInterface>,
}

impl FleetState {
    fn new() -> Self {
        Self {
            hosts: Vec::new(),
            connection_error: false,
            had_success: false,
            sparklines: HashMap::new(),
            history: HashMap::new(),
            detail: None,
            disks: Vec::new(),
            processes: Vec::new(),
            interfaces: Vec::new(),
        }
    }
}

/// The documented fallback record shown when no host list was ever fetched.
fn placeholder_host() -> Host {
    Host {
        id: "demo-1".to_string(),
        name: "Demo Host 01".to_string(),
        ip: "192.168.1.100".to_string(),
        status: HostStatus::Online,
        os: "Ubuntu 22.04".to_string(),
        location: "local".to_string(),
        last_heartbeat: None,
        current_metrics: None,
    }
}

/// Client-side synchronization engine.
///
/// Construct once with the injected collaborators, wrap in an [`Arc`], call
/// [`start`](Self::start), then drive it from the navigation callbacks of
/// the presentation layer.
pub struct SyncOrchestrator {
    provider: Arc<dyn MetricsProvider>,
    settings: SettingsCoordinator,
    state: Mutex<FleetState>,
    navigator: Mutex<Navigator>,
    host_poller: ResourcePoller,
    detail_poller: ResourcePoller,
    network_poller: ResourcePoller,
    process_poller: ResourcePoller,
    host_gate: Arc<FetchGate>,
    detail_gate: Mutex<Arc<FetchGate>>,
    network_gate: Mutex<Arc<FetchGate>>,
    process_gate: Mutex<Arc<FetchGate>>,
    disk_gate: Mutex<Arc<FetchGate>>,
}

impl SyncOrchestrator {
    pub fn new(provider: Arc<dyn MetricsProvider>, store: Arc<dyn SettingsStore>) -> Self {
        Self {
            provider,
            settings: SettingsCoordinator::new(store),
            state: Mutex::new(FleetState::new()),
            navigator: Mutex::new(Navigator::new()),
            host_poller: ResourcePoller::new("host-list"),
            detail_poller: ResourcePoller::new("host-detail"),
            network_poller: ResourcePoller::new("network"),
            process_poller: ResourcePoller::new("process"),
            host_gate: Arc::new(FetchGate::new()),
            detail_gate: Mutex::new(Arc::new(FetchGate::new())),
            network_gate: Mutex::new(Arc::new(FetchGate::new())),
            process_gate: Mutex::new(Arc::new(FetchGate::new())),
            disk_gate: Mutex::new(Arc::new(FetchGate::new())),
        }
    }

    /// Load persisted settings (defaults when absent), configure the
    /// provider, and start the host-list poller.
    pub async fn start(self: &Arc<Self>) {
        let settings = self.settings.load_active().await;
        self.provider
            .configure(&settings.api_url, &settings.api_port, &settings.api_key)
            .await;
        self.start_host_poller();
    }

    /// Stop every poller and discard all in-flight responses.
    pub fn shutdown(&self) {
        self.host_poller.stop();
        self.detail_poller.stop();
        self.network_poller.stop();
        self.process_poller.stop();
        self.host_gate.close();
        self.detail_gate.lock().unwrap().close();
        self.network_gate.lock().unwrap().close();
        self.process_gate.lock().unwrap().close();
        self.disk_gate.lock().unwrap().close();
    }

    // ── Settings ────────────────────────────────────────────────────────

    /// Apply new API settings and immediately refresh every active poller.
    ///
    /// Validation or persistence failure leaves the previous configuration
    /// active and no poller is disturbed.
    pub async fn apply_settings(self: &Arc<Self>, new: ApiSettings) -> Result<(), SettingsError> {
        self.settings.apply(new, self.provider.as_ref()).await?;
        self.resync().await;
        Ok(())
    }

    /// Snapshot of the active API settings.
    pub fn active_settings(&self) -> ApiSettings {
        self.settings.active()
    }

    /// Restart the pollers of the current view. A restarted poller fires its
    /// fetch immediately, which is what makes a settings change visible
    /// without waiting out an interval.
    async fn resync(self: &Arc<Self>) {
        self.start_host_poller();

        let (view, selected) = {
            let nav = self.navigator.lock().unwrap();
            (nav.view(), nav.selected_host().map(str::to_string))
        };
        let Some(id) = selected else { return };

        match view {
            View::Detail => self.start_detail_poller(id),
            View::Network => self.start_network_poller(id),
            View::Process => self.start_process_poller(id),
            View::Disk => {
                let _ = self.sync_disks(id).await;
            }
            View::List => {}
        }
    }

    // ── Navigation wiring ───────────────────────────────────────────────

    /// Select a host from the list and start detail polling for it.
    pub fn enter_detail(self: &Arc<Self>, id: &str) -> Result<(), CoreError> {
        self.navigator.lock().unwrap().select_host(id)?;
        self.start_detail_poller(id.to_string());
        Ok(())
    }

    /// Open the network sub-view and start interface polling.
    pub fn open_network(self: &Arc<Self>) -> Result<(), CoreError> {
        let id = {
            let mut nav = self.navigator.lock().unwrap();
            nav.open_network()?;
            nav.selected_host().map(str::to_string)
        };
        self.stop_detail_poller();
        if let Some(id) = id {
            self.start_network_poller(id);
        }
        Ok(())
    }

    /// Open the disk sub-view. Disks are fetched on entry and on manual
    /// refresh only — no fixed timer.
    pub async fn open_disks(self: &Arc<Self>) -> Result<(), CoreError> {
        let id = {
            let mut nav = self.navigator.lock().unwrap();
            nav.open_disk()?;
            nav.selected_host().map(str::to_string)
        };
        self.stop_detail_poller();
        Self::reset_gate(&self.disk_gate);
        if let Some(id) = id {
            let _ = self.sync_disks(id).await;
        }
        Ok(())
    }

    /// Open the process sub-view and start process polling.
    pub fn open_processes(self: &Arc<Self>) -> Result<(), CoreError> {
        let id = {
            let mut nav = self.navigator.lock().unwrap();
            nav.open_process()?;
            nav.selected_host().map(str::to_string)
        };
        self.stop_detail_poller();
        if let Some(id) = id {
            self.start_process_poller(id);
        }
        Ok(())
    }

    /// Manual pull-to-refresh for the disk sub-view.
    pub async fn refresh_disks(&self) -> Result<(), CoreError> {
        let id = {
            let nav = self.navigator.lock().unwrap();
            nav.selected_host().map(str::to_string)
        };
        match id {
            Some(id) => self.sync_disks(id).await,
            None => Ok(()),
        }
    }

    /// Manual pull-to-refresh for the process sub-view.
    pub async fn refresh_processes(&self) -> Result<(), CoreError> {
        let id = {
            let nav = self.navigator.lock().unwrap();
            nav.selected_host().map(str::to_string)
        };
        match id {
            Some(id) => self.sync_processes(id).await,
            None => Ok(()),
        }
    }

    /// Hardware/system back gesture. Stops the pollers of the view being
    /// left; `BackAction::Exit` means the platform should handle the gesture
    /// (the list view is the root).
    pub fn back(self: &Arc<Self>) -> BackAction {
        let (previous, action, selected) = {
            let mut nav = self.navigator.lock().unwrap();
            let previous = nav.view();
            let action = nav.back();
            (previous, action, nav.selected_host().map(str::to_string))
        };

        match previous {
            View::Network => {
                self.network_poller.stop();
                self.network_gate.lock().unwrap().close();
            }
            View::Process => {
                self.process_poller.stop();
                self.process_gate.lock().unwrap().close();
            }
            View::Disk => {
                self.disk_gate.lock().unwrap().close();
            }
            View::Detail => {
                self.stop_detail_poller();
                self.clear_host_scoped_state();
            }
            View::List => {}
        }

        // Returning from a sub-view lands on the detail screen, which needs
        // its poller back.
        if action == BackAction::Handled {
            if let Some(id) = selected {
                if matches!(previous, View::Network | View::Disk | View::Process) {
                    self.start_detail_poller(id);
                }
            }
        }

        action
    }

    fn clear_host_scoped_state(&self) {
        let mut state = self.state.lock().unwrap();
        state.detail = None;
        state.history.clear();
        state.disks.clear();
        state.processes.clear();
        state.interfaces.clear();
    }

    // ── Poller wiring ───────────────────────────────────────────────────

    /// Swap in a fresh gate, closing the old one so fetches still in flight
    /// against it (they cloned the Arc at issue time) are discarded instead
    /// of overwriting data applied by the restarted poller.
    fn reset_gate(slot: &Mutex<Arc<FetchGate>>) {
        let mut guard = slot.lock().unwrap();
        let old = std::mem::replace(&mut *guard, Arc::new(FetchGate::new()));
        old.close();
    }

    fn start_host_poller(self: &Arc<Self>) {
        let orch = Arc::clone(self);
        self.host_poller.start(HOST_LIST_INTERVAL, move || {
            let orch = Arc::clone(&orch);
            async move { orch.sync_host_list().await }
        });
    }

    fn start_detail_poller(self: &Arc<Self>, id: String) {
        Self::reset_gate(&self.detail_gate);
        let orch = Arc::clone(self);
        self.detail_poller.start(DETAIL_INTERVAL, move || {
            let orch = Arc::clone(&orch);
            let id = id.clone();
            async move { orch.sync_detail(id).await }
        });
    }

    fn stop_detail_poller(&self) {
        self.detail_poller.stop();
        self.detail_gate.lock().unwrap().close();
    }

    fn start_network_poller(self: &Arc<Self>, id: String) {
        Self::reset_gate(&self.network_gate);
        let orch = Arc::clone(self);
        self.network_poller.start(NETWORK_INTERVAL, move || {
            let orch = Arc::clone(&orch);
            let id = id.clone();
            async move { orch.sync_network(id).await }
        });
    }

    fn start_process_poller(self: &Arc<Self>, id: String) {
        Self::reset_gate(&self.process_gate);
        let orch = Arc::clone(self);
        self.process_poller.start(PROCESS_INTERVAL, move || {
            let orch = Arc::clone(&orch);
            let id = id.clone();
            async move { orch.sync_processes(id).await }
        });
    }

    // ── Sync cycles ─────────────────────────────────────────────────────

    /// One host-list sync cycle: fetch, then reconcile in completion order.
    async fn sync_host_list(&self) -> Result<(), CoreError> {
        let seq = self.host_gate.issue();
        match self.provider.list_hosts().await {
            Ok(hosts) => {
                if self.host_gate.admit(seq) {
                    self.apply_host_list(hosts);
                }
                Ok(())
            }
            Err(e) => {
                if self.host_gate.admit(seq) {
                    let mut state = self.state.lock().unwrap();
                    state.connection_error = true;
                    // The list view is never empty: substitute the
                    // documented placeholder until a fetch succeeds.
                    if !state.had_success {
                        state.hosts = vec![placeholder_host()];
                    }
                }
                Err(e.into())
            }
        }
    }

    /// Replace the host collection wholesale. Stale hosts disappear along
    /// with their sparkline windows; current metrics feed the windows of the
    /// hosts that remain.
    fn apply_host_list(&self, hosts: Vec<Host>) {
        let mut state = self.state.lock().unwrap();
        state.connection_error = false;
        state.had_success = true;

        state
            .sparklines
            .retain(|id, _| hosts.iter().any(|h| &h.id == id));

        for host in &hosts {
            if let Some(metrics) = &host.current_metrics {
                let sample = MetricSample {
                    timestamp: host.last_heartbeat.clone().unwrap_or_default(),
                    cpu: metrics.cpu,
                    memory: metrics.memory,
                    network_in: metrics.download,
                    network_out: metrics.upload,
                    ..Default::default()
                };
                state
                    .sparklines
                    .entry(host.id.clone())
                    .or_insert_with(|| MetricWindow::new(SPARKLINE_CAP))
                    .push(sample);
            }
        }

        debug!("Host list replaced: {} hosts", hosts.len());
        state.hosts = hosts;
    }

    /// One detail sync cycle: current readings plus the full history window.
    async fn sync_detail(&self, id: String) -> Result<(), CoreError> {
        let gate = self.detail_gate.lock().unwrap().clone();
        let seq = gate.issue();

        let result = async {
            let detail = self.provider.host_detail(&id).await?;
            let history = self
                .provider
                .host_history(&id, DETAIL_HISTORY_DURATION)
                .await?;
            Ok::<_, CoreError>((detail, history))
        }
        .await;

        match result {
            Ok((detail, history)) => {
                if gate.admit(seq) {
                    let mut state = self.state.lock().unwrap();
                    state.connection_error = false;
                    state.detail = Some(detail);
                    state
                        .history
                        .entry(id)
                        .or_insert_with(|| MetricWindow::new(HISTORY_CAP))
                        .replace(history);
                }
                Ok(())
            }
            Err(e) => {
                if gate.admit(seq) {
                    self.state.lock().unwrap().connection_error = true;
                }
                Err(e)
            }
        }
    }

    async fn sync_network(&self, id: String) -> Result<(), CoreError> {
        let gate = self.network_gate.lock().unwrap().clone();
        let seq = gate.issue();

        match self.provider.network_interfaces(&id).await {
            Ok(interfaces) => {
                if gate.admit(seq) {
                    let mut state = self.state.lock().unwrap();
                    state.connection_error = false;
                    state.interfaces = interfaces;
                }
                Ok(())
            }
            Err(e) => {
                if gate.admit(seq) {
                    self.state.lock().unwrap().connection_error = true;
                }
                Err(e.into())
            }
        }
    }

    async fn sync_processes(&self, id: String) -> Result<(), CoreError> {
        let gate = self.process_gate.lock().unwrap().clone();
        let seq = gate.issue();

        match self
            .provider
            .processes(&id, PROCESS_SORT, PROCESS_LIMIT)
            .await
        {
            Ok(processes) => {
                if gate.admit(seq) {
                    let mut state = self.state.lock().unwrap();
                    state.connection_error = false;
                    state.processes = processes;
                }
                Ok(())
            }
            Err(e) => {
                if gate.admit(seq) {
                    self.state.lock().unwrap().connection_error = true;
                }
                Err(e.into())
            }
        }
    }

    async fn sync_disks(&self, id: String) -> Result<(), CoreError> {
        let gate = self.disk_gate.lock().unwrap().clone();
        let seq = gate.issue();

        match self.provider.disks(&id).await {
            Ok(disks) => {
                if gate.admit(seq) {
                    let mut state = self.state.lock().unwrap();
                    state.connection_error = false;
                    state.disks = disks;
                }
                Ok(())
            }
            Err(e) => {
                if gate.admit(seq) {
                    self.state.lock().unwrap().connection_error = true;
                }
                Err(e.into())
            }
        }
    }

    // ── Read-only snapshots ─────────────────────────────────────────────

    pub fn hosts(&self) -> Vec<Host> {
        self.state.lock().unwrap().hosts.clone()
    }

    pub fn connection_error(&self) -> bool {
        self.state.lock().unwrap().connection_error
    }

    pub fn view(&self) -> View {
        self.navigator.lock().unwrap().view()
    }

    pub fn selected_host(&self) -> Option<String> {
        self.navigator
            .lock()
            .unwrap()
            .selected_host()
            .map(str::to_string)
    }

    pub fn detail(&self) -> Option<HostDetail> {
        self.state.lock().unwrap().detail.clone()
    }

    pub fn disks(&self) -> Vec<Disk> {
        self.state.lock().unwrap().disks.clone()
    }

    pub fn processes(&self) -> Vec<Process> {
        self.state.lock().unwrap().processes.clone()
    }

    pub fn interfaces(&self) -> Vec<NetworkInterface> {
        self.state.lock().unwrap().interfaces.clone()
    }

    /// Chart-ready sparkline points for a host (≥2 points, zero-padded).
    pub fn sparkline_points(&self, id: &str) -> Vec<MetricSample> {
        let state = self.state.lock().unwrap();
        match state.sparklines.get(id) {
            Some(window) => window.chart_points(),
            None => MetricWindow::new(SPARKLINE_CAP).chart_points(),
        }
    }

    /// Chart-ready history points for a host (≥2 points, zero-padded).
    pub fn history_points(&self, id: &str) -> Vec<MetricSample> {
        let state = self.state.lock().unwrap();
        match state.history.get(id) {
            Some(window) => window.chart_points(),
            None => MetricWindow::new(HISTORY_CAP).chart_points(),
        }
    }

    /// Most recent history sample for a host (zero-default when empty).
    pub fn latest_sample(&self, id: &str) -> MetricSample {
        let state = self.state.lock().unwrap();
        state
            .history
            .get(id)
            .map(MetricWindow::latest)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_host_is_deterministic() {
        let a = placeholder_host();
        let b = placeholder_host();
        assert_eq!(a.id, "demo-1");
        assert_eq!(a.id, b.id);
        assert_eq!(a.name, b.name);
        assert_eq!(a.ip, b.ip);
        assert_eq!(a.status, HostStatus::Online);
    }
}
