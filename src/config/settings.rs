use crate::domain::model::PullRequestState;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_distinct, validate_non_empty_string, validate_range, validate_url, Validate,
};
use serde::{Deserialize, Serialize};

/// Hard ceiling the tracker applies to `maxResults`.
pub const MAX_PAGE_SIZE: usize = 1000;

pub const DEFAULT_TRACKER_URL: &str = "https://issues.redhat.com";
pub const DEFAULT_LINKED_PR_FIELD: &str = "customfield_12310220";
pub const DEFAULT_QUERY: &str = concat!(
    "project = MON AND",
    " resolution = Unresolved AND",
    " issuetype in (Bug, Task, Sub-task, Story, Epic, Spike) AND",
    " \"Git Pull Request\" !~ \"https://github.com/openshift\" AND",
    " \"Git Pull Request\" !~ \"https://gitlab.cee.redhat.com\"",
    " ORDER BY priority DESC, updated DESC"
);

pub const DEFAULT_INITIAL_STATE: &str = "To Do";
pub const DEFAULT_INTERMEDIATE_STATE: &str = "In Progress";
pub const DEFAULT_FINAL_STATE: &str = "Code Review";

pub const DEFAULT_PR_HOST: &str = "github.com";
pub const DEFAULT_PR_API_URL: &str = "https://api.github.com";
pub const DEFAULT_EXCLUDED_ORG: &str = "openshift";

pub const ENV_QUERY: &str = "PROJECT_UPSTREAM_ISSUES_JQL_FILTER";
pub const ENV_INITIAL_STATE: &str = "PROJECT_INITIAL_STATE";
pub const ENV_INTERMEDIATE_STATE: &str = "PROJECT_INTERMEDIATE_STATE";
pub const ENV_FINAL_STATE: &str = "PROJECT_FINAL_STATE";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub tracker: TrackerSettings,
    pub states: TargetStates,
    pub pull_requests: PullRequestSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerSettings {
    pub url: String,
    pub query: String,
    pub linked_pr_field: String,
    pub page_size: usize,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_TRACKER_URL.to_string(),
            query: DEFAULT_QUERY.to_string(),
            linked_pr_field: DEFAULT_LINKED_PR_FIELD.to_string(),
            page_size: MAX_PAGE_SIZE,
        }
    }
}

impl TrackerSettings {
    pub fn browse_url(&self, key: &str) -> String {
        format!("{}/browse/{}", self.url.trim_end_matches('/'), key)
    }
}

/// The three workflow states a ticket is reconciled towards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetStates {
    /// Wanted when every linked pull request is closed or merged.
    pub initial: String,
    /// Wanted when a draft pull request is open.
    pub intermediate: String,
    /// Wanted when a pull request is open for review.
    #[serde(rename = "final")]
    pub final_state: String,
}

impl Default for TargetStates {
    fn default() -> Self {
        Self {
            initial: DEFAULT_INITIAL_STATE.to_string(),
            intermediate: DEFAULT_INTERMEDIATE_STATE.to_string(),
            final_state: DEFAULT_FINAL_STATE.to_string(),
        }
    }
}

impl TargetStates {
    pub fn target_for(&self, state: PullRequestState) -> &str {
        match state {
            PullRequestState::Closed => &self.initial,
            PullRequestState::Draft => &self.intermediate,
            PullRequestState::Open => &self.final_state,
        }
    }

    pub fn names(&self) -> [&str; 3] {
        [&self.initial, &self.intermediate, &self.final_state]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullRequestSettings {
    pub host: String,
    pub api_url: String,
    /// Owner whose pull requests are never used as signal.
    pub excluded_org: Option<String>,
}

impl Default for PullRequestSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_PR_HOST.to_string(),
            api_url: DEFAULT_PR_API_URL.to_string(),
            excluded_org: Some(DEFAULT_EXCLUDED_ORG.to_string()),
        }
    }
}

impl Settings {
    /// Applies the `PROJECT_*` overrides. Each one is independent; an unset
    /// variable leaves the current value alone.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let targets: [(&str, &mut String); 4] = [
            (ENV_QUERY, &mut self.tracker.query),
            (ENV_INITIAL_STATE, &mut self.states.initial),
            (ENV_INTERMEDIATE_STATE, &mut self.states.intermediate),
            (ENV_FINAL_STATE, &mut self.states.final_state),
        ];

        for (name, slot) in targets {
            if let Some(value) = lookup(name) {
                tracing::info!("Overriding {} with: {}", name, value);
                *slot = value;
            }
        }
    }

    pub fn apply_process_env(&mut self) {
        self.apply_env_overrides(|name| std::env::var(name).ok());
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_url("tracker.url", &self.tracker.url)?;
        validate_non_empty_string("tracker.query", &self.tracker.query)?;
        validate_non_empty_string("tracker.linked_pr_field", &self.tracker.linked_pr_field)?;
        validate_range("tracker.page_size", self.tracker.page_size, 1, MAX_PAGE_SIZE)?;

        validate_non_empty_string("states.initial", &self.states.initial)?;
        validate_non_empty_string("states.intermediate", &self.states.intermediate)?;
        validate_non_empty_string("states.final", &self.states.final_state)?;
        validate_distinct("states", &self.states.names())?;

        validate_non_empty_string("pull_requests.host", &self.pull_requests.host)?;
        validate_url("pull_requests.api_url", &self.pull_requests.api_url)?;
        if let Some(org) = &self.pull_requests.excluded_org {
            validate_non_empty_string("pull_requests.excluded_org", org)?;
        }

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_mapping() {
        let states = TargetStates::default();
        assert_eq!(states.target_for(PullRequestState::Closed), "To Do");
        assert_eq!(states.target_for(PullRequestState::Draft), "In Progress");
        assert_eq!(states.target_for(PullRequestState::Open), "Code Review");
    }

    #[test]
    fn test_defaults_validate() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_env_overrides_are_independent() {
        let env: HashMap<&str, &str> = [(ENV_FINAL_STATE, "Review"), (ENV_QUERY, "project = X")]
            .into_iter()
            .collect();

        let mut settings = Settings::default();
        settings.apply_env_overrides(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(settings.tracker.query, "project = X");
        assert_eq!(settings.states.final_state, "Review");
        assert_eq!(settings.states.initial, DEFAULT_INITIAL_STATE);
        assert_eq!(settings.states.intermediate, DEFAULT_INTERMEDIATE_STATE);
    }

    #[test]
    fn test_overlapping_state_names_rejected() {
        let mut settings = Settings::default();
        settings.apply_env_overrides(|name| {
            (name == ENV_INTERMEDIATE_STATE).then(|| DEFAULT_FINAL_STATE.to_string())
        });
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_page_size_ceiling() {
        let mut settings = Settings::default();
        settings.tracker.page_size = MAX_PAGE_SIZE + 1;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_browse_url() {
        let tracker = TrackerSettings {
            url: "https://issues.example.com/".to_string(),
            ..TrackerSettings::default()
        };
        assert_eq!(tracker.browse_url("MON-3"), "https://issues.example.com/browse/MON-3");
    }
}
