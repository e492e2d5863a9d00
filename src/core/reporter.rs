use crate::domain::model::DriftRecord;
use std::sync::Mutex;

pub const NO_ASSIGNEE: &str = "NO ASSIGNEE";

/// Logs every drift and, in structured mode, collects a markdown bullet per
/// drift for the end-of-pass summary.
#[derive(Debug, Default)]
pub struct DriftReporter {
    structured: bool,
    bullets: Mutex<Vec<String>>,
}

impl DriftReporter {
    pub fn new(structured: bool) -> Self {
        Self {
            structured,
            bullets: Mutex::new(Vec::new()),
        }
    }

    /// Drops bullets left over from an earlier pass.
    pub fn reset(&self) {
        self.bullets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }

    pub fn report(&self, record: &DriftRecord) {
        tracing::warn!(
            ticket = %record.key,
            "[DEBUG:ISSUE] [{}] {} [{}] - [{}] {} + [{}] {}",
            record.summary,
            record.key,
            record.observed,
            record.observed,
            record.url,
            record.expected,
            record.url
        );

        if self.structured {
            let bullet = markdown_bullet(record);
            self.bullets
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .push(bullet);
        }
    }

    /// Accumulated bullets, or `None` if nothing was collected.
    pub fn payload(&self) -> Option<String> {
        let bullets = self
            .bullets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if bullets.is_empty() {
            return None;
        }
        Some(bullets.iter().map(|b| format!("{}\n", b)).collect())
    }
}

pub fn markdown_bullet(record: &DriftRecord) -> String {
    let assignee = match &record.assignee {
        Some(a) => format!("[{}](mailto:{})", a.display_name, a.email),
        None => NO_ASSIGNEE.to_string(),
    };
    format!(
        "* [{}]({}), assigned to {}: Expected issue state to be '{}', but got '{}'.",
        record.summary, record.url, assignee, record.expected, record.observed
    )
}

/// The summary artifact handed to the output writer.
pub fn summary_json(payload: &str) -> serde_json::Value {
    serde_json::json!({ "response": payload })
}
