use crate::domain::model::Ticket;
use crate::domain::ports::TicketBackend;
use crate::utils::error::{Result, SyncError};

/// Pulls every ticket matching a query, one page at a time.
pub struct TicketFetcher<'a> {
    backend: &'a dyn TicketBackend,
    page_size: usize,
}

impl<'a> TicketFetcher<'a> {
    pub fn new(backend: &'a dyn TicketBackend, page_size: usize) -> Self {
        Self { backend, page_size }
    }

    /// Either every matching ticket or an error; a failed page discards
    /// whatever was accumulated before it.
    pub async fn fetch_all(&self, query: &str) -> Result<Vec<Ticket>> {
        let mut tickets = Vec::new();

        loop {
            let start_at = tickets.len();
            let page = self
                .backend
                .search(query, start_at, self.page_size)
                .await?;
            tracing::debug!(
                "Fetched page at offset {}: {} tickets, {} total",
                start_at,
                page.tickets.len(),
                page.total
            );

            if page.tickets.is_empty() && start_at < page.total {
                return Err(SyncError::FetchError {
                    message: format!(
                        "empty page at offset {} before reaching reported total {}",
                        start_at, page.total
                    ),
                });
            }

            tickets.extend(page.tickets);
            if tickets.len() >= page.total {
                break;
            }
        }

        tracing::info!("📥 Fetched {} tickets", tickets.len());
        Ok(tickets)
    }
}
