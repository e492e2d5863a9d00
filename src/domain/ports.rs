use crate::domain::model::{LegalTransitions, PullRequestState, SearchPage};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Issue tracker operations needed for one reconciliation pass.
#[async_trait]
pub trait TicketBackend: Send + Sync {
    async fn search(&self, query: &str, start_at: usize, max_results: usize) -> Result<SearchPage>;
    async fn legal_transitions(&self, ticket_id: &str) -> Result<LegalTransitions>;
}

/// Pull request host operations. `api_url` is already in item-detail form.
#[async_trait]
pub trait PullRequestBackend: Send + Sync {
    async fn pull_request_detail(&self, api_url: &str) -> Result<serde_json::Value>;
}

#[async_trait]
pub trait Classify: Send + Sync {
    async fn classify(&self, reference: &str) -> Result<PullRequestState>;
}
