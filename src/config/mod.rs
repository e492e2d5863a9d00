#[cfg(feature = "cli")]
pub mod cli;
pub mod settings;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use settings::{Settings, TargetStates};

use crate::utils::error::Result;
use crate::utils::validation::Validate;
use std::path::Path;

/// Builds the settings for one run: defaults, then the optional file, then
/// the `PROJECT_*` environment overrides. The result is validated and never
/// changed afterwards.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let mut settings = match path {
        Some(path) => {
            tracing::info!("Loading settings from {}", path.display());
            Settings::from_file(path)?
        }
        None => Settings::default(),
    };
    settings.apply_process_env();
    settings.validate()?;
    Ok(settings)
}
