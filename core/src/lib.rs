pub mod errors;
pub mod format;
pub mod navigator;
pub mod orchestrator;
pub mod poller;
pub mod provider;
pub mod settings;
pub mod types;
pub mod window;
