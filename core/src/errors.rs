//! Unified error types for the fleetpulse core crate.
//!
//! The presentation layer maps these to whatever its platform surface needs
//! (dialog text, toast, serialized bridge error). Nothing here is fatal to a
//! running sync loop: fetch errors are absorbed per cycle by the pollers and
//! only settings errors are surfaced synchronously to the caller.

use thiserror::Error;

use crate::navigator::NavigationError;

/// Top-level error type encompassing all core error categories.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A settings validation or persistence error.
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    /// A fetch error from the metrics provider.
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// An illegal view transition.
    #[error("Navigation error: {0}")]
    Navigation(#[from] NavigationError),

    /// Catch-all for errors that don't fit other categories.
    #[error("{0}")]
    Other(String),
}

/// Errors raised when applying or persisting API settings.
///
/// These are rejected before any network activity and never mutate the
/// previously active configuration.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The API base address is empty.
    #[error("API address must not be empty")]
    EmptyAddress,

    /// The API port is empty or contains non-digit characters.
    #[error("API port must be numeric, got: {0}")]
    InvalidPort(String),

    /// The settings store failed to persist the configuration.
    #[error("Failed to persist settings: {0}")]
    StoreFailed(String),
}

/// Errors returned by the metrics provider for a single fetch cycle.
///
/// The sync engine treats every variant uniformly as "fetch failed for this
/// cycle": the affected poller stays on schedule and the connection-problem
/// flag is raised.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Network failure, timeout, or a non-success HTTP status.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend rejected the request credential.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The provider has not been configured yet.
    #[error("Metrics provider not configured")]
    NotConfigured,
}
