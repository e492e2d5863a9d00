use crate::domain::model::{Assignee, LegalTransitions, LinkedField, SearchPage, Ticket};
use crate::domain::ports::TicketBackend;
use crate::utils::error::{Result, SyncError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
struct SearchResponse {
    total: usize,
    #[serde(default)]
    issues: Vec<JiraIssue>,
}

#[derive(Debug, Deserialize)]
struct JiraIssue {
    id: String,
    key: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct TransitionsResponse {
    #[serde(default)]
    transitions: Vec<Transition>,
}

#[derive(Debug, Deserialize)]
struct Transition {
    name: String,
}

/// Jira REST v2 client with bearer-token auth.
#[derive(Debug, Clone)]
pub struct JiraClient {
    client: Client,
    base_url: String,
    linked_field: String,
}

impl JiraClient {
    pub fn new(base_url: &str, token: &str, linked_field: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if !token.is_empty() {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| {
                SyncError::ConfigError {
                    message: format!("Invalid Jira token: {}", e),
                }
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            linked_field: linked_field.to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/rest/api/2/{}", self.base_url, path)
    }

    /// Confirms the tracker answers with the configured credentials.
    pub async fn preflight(&self) -> Result<()> {
        let response = self
            .client
            .get(self.endpoint("status"))
            .send()
            .await
            .map_err(|e| SyncError::BackendUnreachableError {
                backend: "Jira".to_string(),
                message: e.to_string(),
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::PreflightError {
                backend: "Jira".to_string(),
                status: status.as_u16(),
            });
        }
        tracing::debug!("Jira preflight ok");
        Ok(())
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let response = self.client.get(url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::UnexpectedStatusError {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl TicketBackend for JiraClient {
    async fn search(&self, query: &str, start_at: usize, max_results: usize) -> Result<SearchPage> {
        let fields = format!("summary,status,assignee,{}", self.linked_field);
        let params = [
            ("jql", query.to_string()),
            ("startAt", start_at.to_string()),
            ("maxResults", max_results.to_string()),
            ("fields", fields),
        ];
        let response: SearchResponse = self.get_json(&self.endpoint("search"), &params).await?;

        Ok(SearchPage {
            total: response.total,
            tickets: response
                .issues
                .into_iter()
                .map(|issue| into_ticket(issue, &self.linked_field))
                .collect(),
        })
    }

    async fn legal_transitions(&self, ticket_id: &str) -> Result<LegalTransitions> {
        let url = self.endpoint(&format!("issue/{}/transitions", ticket_id));
        let response: TransitionsResponse = self.get_json(&url, &[]).await?;
        Ok(response.transitions.into_iter().map(|t| t.name).collect())
    }
}

fn into_ticket(issue: JiraIssue, linked_field: &str) -> Ticket {
    let fields = &issue.fields;
    let text = |value: Option<&Value>| value.and_then(Value::as_str).unwrap_or_default().to_string();

    let assignee = fields
        .get("assignee")
        .filter(|v| v.is_object())
        .map(|a| Assignee {
            display_name: text(a.get("displayName")),
            email: text(a.get("emailAddress")),
        });

    Ticket {
        summary: text(fields.get("summary")),
        status: text(fields.get("status").and_then(|s| s.get("name"))),
        assignee,
        linked: linked_field_of(fields.get(linked_field)),
        id: issue.id,
        key: issue.key,
    }
}

fn linked_field_of(value: Option<&Value>) -> LinkedField {
    match value {
        None | Some(Value::Null) => LinkedField::Absent,
        Some(Value::Array(items)) => {
            let mut refs = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                match item.as_str() {
                    Some(reference) => refs.push(reference.to_string()),
                    None => return LinkedField::Malformed(format!("entry {} is not a string", index)),
                }
            }
            LinkedField::Present(refs)
        }
        Some(_) => LinkedField::Malformed("expected a list of URLs".to_string()),
    }
}
