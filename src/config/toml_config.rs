use crate::config::settings::Settings;
use crate::utils::error::{Result, SyncError};
use regex::Regex;
use std::path::Path;

impl Settings {
    /// Loads settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| SyncError::ConfigError {
            message: format!("Cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// Missing sections and keys fall back to the built-in defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SyncError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }
}

/// Expands `${VAR}` references from the process environment.
fn substitute_env_vars(content: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SyncError::ConfigError {
        message: format!("Invalid substitution pattern: {}", e),
    })?;

    let result = re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    });

    Ok(result.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::{DEFAULT_PR_API_URL, DEFAULT_QUERY};

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings = Settings::from_toml_str(
            r#"
[states]
final = "Review"

[pull_requests]
excluded_org = "my-mirror"
"#,
        )
        .unwrap();

        assert_eq!(settings.states.final_state, "Review");
        assert_eq!(settings.states.initial, "To Do");
        assert_eq!(settings.tracker.query, DEFAULT_QUERY);
        assert_eq!(settings.pull_requests.api_url, DEFAULT_PR_API_URL);
        assert_eq!(settings.pull_requests.excluded_org.as_deref(), Some("my-mirror"));
    }

    #[test]
    fn test_env_substitution() {
        // Unique name so parallel tests never race on it.
        std::env::set_var("PRDRIFT_TEST_TRACKER_URL", "https://jira.example.com");
        let settings = Settings::from_toml_str(
            r#"
[tracker]
url = "${PRDRIFT_TEST_TRACKER_URL}"
page_size = 50
"#,
        )
        .unwrap();

        assert_eq!(settings.tracker.url, "https://jira.example.com");
        assert_eq!(settings.tracker.page_size, 50);
    }

    #[test]
    fn test_unset_variable_left_verbatim() {
        let content = "query = \"${PRDRIFT_TEST_DEFINITELY_UNSET}\"";
        assert_eq!(substitute_env_vars(content).unwrap(), content);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = Settings::from_toml_str("[states\ninitial = 1").unwrap_err();
        assert!(matches!(err, SyncError::ConfigError { .. }));
    }
}
