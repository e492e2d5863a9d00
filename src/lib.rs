pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{load_settings, Settings, TargetStates};

pub use adapters::{GitHubClient, JiraClient, LocalStorage};
pub use crate::core::{
    reconciler::{PassSummary, Reconciler},
    reporter::DriftReporter,
};
pub use utils::error::{Result, SyncError};
