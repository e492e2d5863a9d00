use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("{backend} preflight failed with status {status}")]
    PreflightError { backend: String, status: u16 },

    #[error("{backend} is unreachable: {message}")]
    BackendUnreachableError { backend: String, message: String },

    #[error("Unexpected status {status} from {url}")]
    UnexpectedStatusError { url: String, status: u16 },

    #[error("Failed to fetch issues: {message}")]
    FetchError { message: String },

    #[error("state \"{state}\" is not a valid state for issue \"{ticket}\"")]
    MissingTransitionError { state: String, ticket: String },

    #[error("no linked PRs found for: {ticket}")]
    NoLinkedPullRequestsError { ticket: String },

    #[error("invalid linked PR field for {ticket}: {reason}")]
    InvalidLinkedFieldError { ticket: String, reason: String },

    #[error("invalid upstream PR URL {reference}: {reason}")]
    InvalidReferenceError { reference: String, reason: String },

    #[error("\"{field}\" field not found in GH API response: {reference}")]
    MissingFieldError { field: String, reference: String },

    #[error("malformed GH API response for {reference}: {message}")]
    MalformedResponseError { reference: String, message: String },

    #[error("unknown upstream PR state \"{state}\" for {reference}")]
    UnknownPullRequestStateError { state: String, reference: String },

    #[error("GH API lookup failed for {reference}: {message}")]
    PullRequestLookupError { reference: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Setup,
    Fetch,
    Validation,
    Classification,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SyncError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SyncError::ConfigError { .. }
            | SyncError::InvalidConfigValueError { .. }
            | SyncError::PreflightError { .. }
            | SyncError::BackendUnreachableError { .. } => ErrorCategory::Setup,
            SyncError::ApiError(_)
            | SyncError::UnexpectedStatusError { .. }
            | SyncError::FetchError { .. } => ErrorCategory::Fetch,
            SyncError::MissingTransitionError { .. }
            | SyncError::NoLinkedPullRequestsError { .. }
            | SyncError::InvalidLinkedFieldError { .. }
            | SyncError::InvalidReferenceError { .. } => ErrorCategory::Validation,
            SyncError::MissingFieldError { .. }
            | SyncError::MalformedResponseError { .. }
            | SyncError::UnknownPullRequestStateError { .. }
            | SyncError::PullRequestLookupError { .. } => ErrorCategory::Classification,
            SyncError::IoError(_) | SyncError::SerializationError(_) => ErrorCategory::Output,
        }
    }

    /// Severity as seen from the top level. Per-ticket errors never reach
    /// `main`, so anything classified `Low` here is only ever logged.
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation | ErrorCategory::Classification => ErrorSeverity::Low,
            ErrorCategory::Fetch => ErrorSeverity::Medium,
            ErrorCategory::Output => ErrorSeverity::High,
            ErrorCategory::Setup => ErrorSeverity::Critical,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SyncError::ConfigError { .. } | SyncError::InvalidConfigValueError { .. } => {
                "Check the configuration file and the PROJECT_* environment overrides"
            }
            SyncError::PreflightError { .. } | SyncError::BackendUnreachableError { .. } => {
                "Verify JIRA_KEY and GH_KEY are set and that both backends are reachable"
            }
            SyncError::ApiError(_)
            | SyncError::UnexpectedStatusError { .. }
            | SyncError::FetchError { .. } => "Re-run the pass; no partial results were used",
            SyncError::MissingTransitionError { .. } => {
                "Make sure the configured target states exist in the issue type's workflow"
            }
            SyncError::NoLinkedPullRequestsError { .. }
            | SyncError::InvalidLinkedFieldError { .. }
            | SyncError::InvalidReferenceError { .. } => {
                "Fix the issue's linked pull request field"
            }
            SyncError::MissingFieldError { .. }
            | SyncError::MalformedResponseError { .. }
            | SyncError::UnknownPullRequestStateError { .. }
            | SyncError::PullRequestLookupError { .. } => {
                "Check the pull request host's API response for this pull request"
            }
            SyncError::IoError(_) | SyncError::SerializationError(_) => {
                "Check that the summary path is writable"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Setup => format!("Setup failed: {}", self),
            ErrorCategory::Fetch => format!("Could not retrieve issues: {}", self),
            ErrorCategory::Validation => format!("Issue skipped: {}", self),
            ErrorCategory::Classification => format!("Pull request lookup failed: {}", self),
            ErrorCategory::Output => format!("Could not write summary: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
