// Adapters layer: concrete implementations of the domain ports (tracker, PR host, storage).

pub mod github;
pub mod jira;
pub mod storage;

pub use github::GitHubClient;
pub use jira::JiraClient;
pub use storage::LocalStorage;
