use crate::utils::error::{Result, SyncError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    pub display_name: String,
    pub email: String,
}

/// Raw state of the linked pull request field as the tracker returned it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkedField {
    Absent,
    Present(Vec<String>),
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub id: String,
    pub key: String,
    pub summary: String,
    pub status: String,
    pub assignee: Option<Assignee>,
    pub linked: LinkedField,
}

impl Ticket {
    /// Linked pull request references.
    ///
    /// `Ok(None)` means the tracker did not return the field at all, while
    /// `Ok(Some(&[]))` means it is present but empty. A field that is not a
    /// list of strings is an error for this ticket only.
    pub fn linked_pull_requests(&self) -> Result<Option<&[String]>> {
        match &self.linked {
            LinkedField::Absent => Ok(None),
            LinkedField::Present(refs) => Ok(Some(refs.as_slice())),
            LinkedField::Malformed(reason) => Err(SyncError::InvalidLinkedFieldError {
                ticket: self.key.clone(),
                reason: reason.clone(),
            }),
        }
    }
}

/// One page of a ticket search.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub tickets: Vec<Ticket>,
    pub total: usize,
}

/// Workflow states the tracker currently allows moving a ticket into.
pub type LegalTransitions = BTreeSet<String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PullRequestState {
    /// Open and ready for review.
    Open,
    /// Open, not ready for review.
    Draft,
    /// Merged or closed.
    Closed,
}

impl fmt::Display for PullRequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PullRequestState::Open => "open",
            PullRequestState::Draft => "draft",
            PullRequestState::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// A parsed `https://<host>/<owner>/<repo>/pull/<number>` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

impl PullRequestRef {
    /// Item-detail URL in the API's `pulls/<n>` collection form.
    pub fn api_url(&self, api_base: &str) -> String {
        format!(
            "{}/repos/{}/{}/pulls/{}",
            api_base.trim_end_matches('/'),
            self.owner,
            self.repo,
            self.number
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriftRecord {
    pub key: String,
    pub summary: String,
    pub url: String,
    pub assignee: Option<Assignee>,
    pub expected: String,
    pub observed: String,
}
