pub mod aggregator;
pub mod classifier;
pub mod fetcher;
pub mod reconciler;
pub mod reporter;

pub use crate::domain::model::{DriftRecord, PullRequestState, Ticket};
pub use crate::domain::ports::{Classify, PullRequestBackend, Storage, TicketBackend};
pub use crate::utils::error::Result;
