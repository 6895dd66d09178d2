//! Abstract metrics provider contract.
//!
//! The sync engine never talks HTTP itself. A concrete provider (REST
//! client, test double, bridge to a platform networking stack) implements
//! this trait and is injected into the orchestrator at construction —
//! explicitly owned, never ambient process state. Reconfiguration happens
//! through a single [`configure`](MetricsProvider::configure) call so no
//! fetch can observe a half-updated address/credential pair.

use crate::errors::FetchError;
use crate::types::{Disk, Host, HostDetail, MetricSample, NetworkInterface, Process, SortKey};

/// History duration requested for the detail-screen charts.
pub const DETAIL_HISTORY_DURATION: &str = "20m";

/// Default sort key for the process list.
pub const PROCESS_SORT: SortKey = SortKey::Cpu;

/// Default process list length.
pub const PROCESS_LIMIT: usize = 20;

/// Async collaborator the sync engine polls for fleet data.
///
/// Every operation may fail with a transport or authentication error; the
/// engine treats all failures uniformly as "fetch failed for this cycle".
#[async_trait::async_trait]
pub trait MetricsProvider: Send + Sync {
    /// Swap the active endpoint configuration.
    ///
    /// Takes effect atomically: fetches issued after this call use the new
    /// address, port, and credential together.
    async fn configure(&self, address: &str, port: &str, credential: &str);

    /// Fetch the full host list.
    async fn list_hosts(&self) -> Result<Vec<Host>, FetchError>;

    /// Fetch detail (current readings + static info) for one host.
    async fn host_detail(&self, id: &str) -> Result<HostDetail, FetchError>;

    /// Fetch the complete recent-history window for one host.
    ///
    /// `duration` is a backend duration spec such as `"20m"`. The response
    /// is a full window, not a delta.
    async fn host_history(&self, id: &str, duration: &str)
        -> Result<Vec<MetricSample>, FetchError>;

    /// Fetch the mounted filesystems of one host.
    async fn disks(&self, id: &str) -> Result<Vec<Disk>, FetchError>;

    /// Fetch the top processes of one host.
    async fn processes(
        &self,
        id: &str,
        sort: SortKey,
        limit: usize,
    ) -> Result<Vec<Process>, FetchError>;

    /// Fetch the network interfaces of one host.
    async fn network_interfaces(&self, id: &str) -> Result<Vec<NetworkInterface>, FetchError>;
}
