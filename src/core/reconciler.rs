use crate::config::settings::Settings;
use crate::core::aggregator::StateAggregator;
use crate::core::classifier::PullRequestClassifier;
use crate::core::fetcher::TicketFetcher;
use crate::core::reporter::DriftReporter;
use crate::domain::model::{DriftRecord, Ticket};
use crate::domain::ports::{Classify, PullRequestBackend, TicketBackend};
use crate::utils::error::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;

/// What happened to one ticket during a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    InSync,
    Drifted(DriftRecord),
    Failed,
    /// The deadline had passed before the evaluation started.
    Skipped,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub fetched: usize,
    pub dispatched: usize,
    pub in_sync: usize,
    pub drifted: usize,
    pub failed: usize,
    pub skipped: usize,
    pub records: Vec<DriftRecord>,
}

impl PassSummary {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::InSync => self.in_sync += 1,
            Outcome::Drifted(record) => {
                self.drifted += 1;
                self.records.push(record);
            }
            Outcome::Failed => self.failed += 1,
            Outcome::Skipped => self.skipped += 1,
        }
    }
}

struct Shared {
    tickets: Arc<dyn TicketBackend>,
    classifier: Arc<dyn Classify>,
    settings: Arc<Settings>,
    reporter: Arc<DriftReporter>,
}

/// Runs one pass: fetch every candidate ticket, evaluate each concurrently,
/// report drift. Tickets are never modified.
pub struct Reconciler {
    shared: Arc<Shared>,
    limit: Option<Arc<Semaphore>>,
}

impl Reconciler {
    pub fn new(
        tickets: Arc<dyn TicketBackend>,
        pull_requests: Arc<dyn PullRequestBackend>,
        settings: Arc<Settings>,
        reporter: Arc<DriftReporter>,
    ) -> Result<Self> {
        let classifier = PullRequestClassifier::new(pull_requests, &settings.pull_requests)?;
        Ok(Self::with_classifier(
            tickets,
            Arc::new(classifier),
            settings,
            reporter,
        ))
    }

    pub fn with_classifier(
        tickets: Arc<dyn TicketBackend>,
        classifier: Arc<dyn Classify>,
        settings: Arc<Settings>,
        reporter: Arc<DriftReporter>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                tickets,
                classifier,
                settings,
                reporter,
            }),
            limit: None,
        }
    }

    /// Bounds concurrent evaluations. `None` (the default) means one task per
    /// ticket with no cap.
    pub fn with_max_in_flight(mut self, max_in_flight: Option<usize>) -> Self {
        self.limit = max_in_flight.map(|n| Arc::new(Semaphore::new(n.max(1))));
        self
    }

    pub fn reporter(&self) -> &Arc<DriftReporter> {
        &self.shared.reporter
    }

    pub async fn run_with_timeout(&self, timeout: Duration) -> Result<PassSummary> {
        self.run(Instant::now() + timeout).await
    }

    /// The deadline only gates dispatch and evaluation entry. Requests already
    /// in flight run to completion, and the pass waits for every dispatched
    /// evaluation.
    pub async fn run(&self, deadline: Instant) -> Result<PassSummary> {
        self.shared.reporter.reset();

        let settings = &self.shared.settings;
        let fetcher = TicketFetcher::new(self.shared.tickets.as_ref(), settings.tracker.page_size);
        let tickets = fetcher.fetch_all(&settings.tracker.query).await?;

        let mut summary = PassSummary {
            fetched: tickets.len(),
            ..PassSummary::default()
        };

        let mut tasks = JoinSet::new();
        for ticket in tickets {
            if Instant::now() >= deadline {
                tracing::warn!(
                    "[timeout] Deadline exceeded, not dispatching {} remaining tickets",
                    summary.fetched - summary.dispatched
                );
                break;
            }

            let shared = Arc::clone(&self.shared);
            let limit = self.limit.clone();
            tasks.spawn(async move {
                let _permit = match limit {
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };
                shared.evaluate(&ticket, deadline).await
            });
            summary.dispatched += 1;
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => summary.record(outcome),
                Err(e) => {
                    tracing::error!("Evaluation task failed: {}", e);
                    summary.record(Outcome::Failed);
                }
            }
        }

        summary.records.sort_by(|a, b| a.key.cmp(&b.key));
        tracing::info!(
            "✅ Pass complete: {} fetched, {} dispatched, {} in sync, {} drifted, {} failed, {} skipped",
            summary.fetched,
            summary.dispatched,
            summary.in_sync,
            summary.drifted,
            summary.failed,
            summary.skipped
        );
        Ok(summary)
    }
}

impl Shared {
    async fn evaluate(&self, ticket: &Ticket, deadline: Instant) -> Outcome {
        if Instant::now() >= deadline {
            tracing::warn!(ticket = %ticket.key, "[timeout] Skipping {}: deadline exceeded", ticket.key);
            return Outcome::Skipped;
        }

        match self.drift_for(ticket).await {
            Ok(Some(record)) => {
                self.reporter.report(&record);
                Outcome::Drifted(record)
            }
            Ok(None) => Outcome::InSync,
            Err(e) => {
                tracing::error!(
                    ticket = %ticket.key,
                    category = ?e.category(),
                    "[{}] Failed to verify issue state: {}",
                    ticket.key,
                    e
                );
                Outcome::Failed
            }
        }
    }

    async fn drift_for(&self, ticket: &Ticket) -> Result<Option<DriftRecord>> {
        let legal = self.tickets.legal_transitions(&ticket.id).await?;
        let resolution = StateAggregator::new(&self.settings.states)
            .resolve(ticket, &legal, self.classifier.as_ref())
            .await?;

        if resolution.state == ticket.status {
            tracing::debug!(ticket = %ticket.key, "{} is in sync ({})", ticket.key, ticket.status);
            return Ok(None);
        }

        Ok(Some(DriftRecord {
            key: ticket.key.clone(),
            summary: ticket.summary.clone(),
            url: self.settings.tracker.browse_url(&ticket.key),
            assignee: ticket.assignee.clone(),
            expected: resolution.state,
            observed: ticket.status.clone(),
        }))
    }
}
