use crate::config::settings::TargetStates;
use crate::domain::model::{LegalTransitions, Ticket};
use crate::domain::ports::Classify;
use crate::utils::error::{Result, SyncError};
use std::collections::BTreeMap;

/// How many linked pull requests point at each target state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedStateCounts(BTreeMap<String, usize>);

impl ObservedStateCounts {
    pub fn new(states: &TargetStates) -> Self {
        Self(states.names().iter().map(|name| (name.to_string(), 0)).collect())
    }

    pub fn increment(&mut self, state: &str) {
        *self.0.entry(state.to_string()).or_insert(0) += 1;
    }

    pub fn get(&self, state: &str) -> usize {
        self.0.get(state).copied().unwrap_or(0)
    }

    /// Initial < Intermediate < Final: a single higher signal wins.
    pub fn resolve<'s>(&self, states: &'s TargetStates) -> &'s str {
        let mut resolved = states.initial.as_str();
        if self.get(&states.intermediate) >= 1 {
            resolved = states.intermediate.as_str();
        }
        if self.get(&states.final_state) >= 1 {
            resolved = states.final_state.as_str();
        }
        resolved
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub state: String,
    pub counts: ObservedStateCounts,
}

pub struct StateAggregator<'a> {
    states: &'a TargetStates,
}

impl<'a> StateAggregator<'a> {
    pub fn new(states: &'a TargetStates) -> Self {
        Self { states }
    }

    /// Every target state must be reachable before any pull request is looked up.
    pub fn check_legal(&self, ticket: &Ticket, legal: &LegalTransitions) -> Result<()> {
        for state in self.states.names() {
            if !legal.contains(state) {
                return Err(SyncError::MissingTransitionError {
                    state: state.to_string(),
                    ticket: ticket.key.clone(),
                });
            }
        }
        Ok(())
    }

    pub async fn resolve<C>(
        &self,
        ticket: &Ticket,
        legal: &LegalTransitions,
        classifier: &C,
    ) -> Result<Resolution>
    where
        C: Classify + ?Sized,
    {
        self.check_legal(ticket, legal)?;

        let references = match ticket.linked_pull_requests()? {
            Some(refs) if !refs.is_empty() => refs,
            _ => {
                return Err(SyncError::NoLinkedPullRequestsError {
                    ticket: ticket.key.clone(),
                })
            }
        };

        let mut counts = ObservedStateCounts::new(self.states);
        for reference in references {
            let pr_state = classifier.classify(reference).await?;
            let wanted = self.states.target_for(pr_state);
            counts.increment(wanted);

            if wanted != ticket.status {
                tracing::debug!(
                    ticket = %ticket.key,
                    "[DEBUG:PR] [{}] {} [{}] - [{}] + [{}]",
                    ticket.summary,
                    reference,
                    pr_state,
                    ticket.status,
                    wanted
                );
            }
        }

        Ok(Resolution {
            state: counts.resolve(self.states).to_string(),
            counts,
        })
    }
}
