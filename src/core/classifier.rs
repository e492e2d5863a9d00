use crate::config::settings::PullRequestSettings;
use crate::domain::model::{PullRequestRef, PullRequestState};
use crate::domain::ports::{Classify, PullRequestBackend};
use crate::utils::error::{Result, SyncError};
use async_trait::async_trait;
use regex::Regex;
use std::sync::Arc;

/// Recognises `https://<host>/<owner>/<repo>/pull/<number>` references.
#[derive(Debug, Clone)]
pub struct ReferencePattern {
    pattern: Regex,
    excluded_org: Option<String>,
}

impl ReferencePattern {
    pub fn new(settings: &PullRequestSettings) -> Result<Self> {
        let source = format!(
            r"^https://{}/([^/]+)/([^/]+)/pull/(\d+)$",
            regex::escape(&settings.host)
        );
        let pattern = Regex::new(&source).map_err(|e| SyncError::InvalidConfigValueError {
            field: "pull_requests.host".to_string(),
            value: settings.host.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            pattern,
            excluded_org: settings.excluded_org.clone(),
        })
    }

    pub fn parse(&self, reference: &str) -> Result<PullRequestRef> {
        let invalid = |reason: &str| SyncError::InvalidReferenceError {
            reference: reference.to_string(),
            reason: reason.to_string(),
        };

        let caps = self
            .pattern
            .captures(reference)
            .ok_or_else(|| invalid("expected https://<host>/<owner>/<repo>/pull/<number>"))?;

        let owner = &caps[1];
        if self.excluded_org.as_deref() == Some(owner) {
            return Err(invalid("owner is the excluded organization"));
        }

        let number = caps[3]
            .parse::<u64>()
            .map_err(|_| invalid("pull request number out of range"))?;

        Ok(PullRequestRef {
            owner: owner.to_string(),
            repo: caps[2].to_string(),
            number,
        })
    }
}

/// Maps a pull request detail body onto the three review states.
///
/// Both `state` and `draft` are required, even for closed pull requests.
pub fn classify_detail(body: &serde_json::Value, reference: &str) -> Result<PullRequestState> {
    let object = body
        .as_object()
        .ok_or_else(|| SyncError::MalformedResponseError {
            reference: reference.to_string(),
            message: "response body is not a JSON object".to_string(),
        })?;

    let missing = |field: &str| SyncError::MissingFieldError {
        field: field.to_string(),
        reference: reference.to_string(),
    };
    let state = object
        .get("state")
        .and_then(|v| v.as_str())
        .ok_or_else(|| missing("state"))?;
    let draft = object
        .get("draft")
        .and_then(|v| v.as_bool())
        .ok_or_else(|| missing("draft"))?;

    match (state, draft) {
        ("open", false) => Ok(PullRequestState::Open),
        ("open", true) => Ok(PullRequestState::Draft),
        ("closed", _) => Ok(PullRequestState::Closed),
        (other, _) => Err(SyncError::UnknownPullRequestStateError {
            state: other.to_string(),
            reference: reference.to_string(),
        }),
    }
}

pub struct PullRequestClassifier {
    backend: Arc<dyn PullRequestBackend>,
    pattern: ReferencePattern,
    api_url: String,
}

impl PullRequestClassifier {
    pub fn new(backend: Arc<dyn PullRequestBackend>, settings: &PullRequestSettings) -> Result<Self> {
        Ok(Self {
            backend,
            pattern: ReferencePattern::new(settings)?,
            api_url: settings.api_url.clone(),
        })
    }
}

#[async_trait]
impl Classify for PullRequestClassifier {
    async fn classify(&self, reference: &str) -> Result<PullRequestState> {
        let pr = self.pattern.parse(reference)?;
        let url = pr.api_url(&self.api_url);
        tracing::debug!("Fetching pull request detail: {}", url);

        let body = self.backend.pull_request_detail(&url).await?;
        classify_detail(&body, reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    const REF: &str = "https://github.com/org/repo/pull/42";

    fn pattern() -> ReferencePattern {
        ReferencePattern::new(&PullRequestSettings::default()).unwrap()
    }

    #[test]
    fn test_accepts_upstream_reference() {
        let pr = pattern().parse(REF).unwrap();
        assert_eq!(pr.owner, "org");
        assert_eq!(pr.repo, "repo");
        assert_eq!(pr.number, 42);
    }

    #[test]
    fn test_rejects_excluded_org() {
        let err = pattern()
            .parse("https://github.com/openshift/repo/pull/1")
            .unwrap_err();
        assert!(matches!(err, SyncError::InvalidReferenceError { .. }));
    }

    #[test]
    fn test_excluded_org_must_match_whole_owner() {
        assert!(pattern()
            .parse("https://github.com/openshift-eng/repo/pull/1")
            .is_ok());
    }

    #[test]
    fn test_rejects_wrong_shapes() {
        let pattern = pattern();
        for reference in [
            "https://github.com/org/repo/issues/1",
            "https://github.com/org/repo/pull/1/files",
            "http://github.com/org/repo/pull/1",
            "https://gitlab.com/org/repo/pull/1",
            "https://github.com/org/repo/pull/abc",
        ] {
            assert!(pattern.parse(reference).is_err(), "{} should be rejected", reference);
        }
    }

    #[test]
    fn test_host_is_not_a_regex() {
        let settings = PullRequestSettings {
            host: "git.example.com".to_string(),
            ..PullRequestSettings::default()
        };
        let pattern = ReferencePattern::new(&settings).unwrap();
        assert!(pattern.parse("https://git.example.com/a/b/pull/1").is_ok());
        assert!(pattern.parse("https://gitXexample.com/a/b/pull/1").is_err());
    }

    #[test]
    fn test_classify_detail() {
        assert_eq!(
            classify_detail(&json!({"state": "open", "draft": false}), REF).unwrap(),
            PullRequestState::Open
        );
        assert_eq!(
            classify_detail(&json!({"state": "open", "draft": true}), REF).unwrap(),
            PullRequestState::Draft
        );
        assert_eq!(
            classify_detail(&json!({"state": "closed", "draft": false}), REF).unwrap(),
            PullRequestState::Closed
        );
    }

    #[test]
    fn test_classify_detail_requires_draft() {
        let err = classify_detail(&json!({"state": "closed"}), REF).unwrap_err();
        assert!(matches!(err, SyncError::MissingFieldError { ref field, .. } if field == "draft"));
    }

    #[test]
    fn test_classify_detail_unknown_state() {
        let err = classify_detail(&json!({"state": "merged", "draft": false}), REF).unwrap_err();
        assert!(matches!(err, SyncError::UnknownPullRequestStateError { .. }));

        // Without a draft field the missing field is reported first.
        assert!(classify_detail(&json!({"state": "merged"}), REF).is_err());
    }

    #[test]
    fn test_classify_detail_rejects_non_objects() {
        assert!(matches!(
            classify_detail(&json!([1, 2]), REF).unwrap_err(),
            SyncError::MalformedResponseError { .. }
        ));
        assert!(matches!(
            classify_detail(&json!({"state": 1, "draft": false}), REF).unwrap_err(),
            SyncError::MissingFieldError { .. }
        ));
    }

    struct RecordingBackend {
        urls: Mutex<Vec<String>>,
        body: serde_json::Value,
    }

    #[async_trait]
    impl PullRequestBackend for RecordingBackend {
        async fn pull_request_detail(&self, api_url: &str) -> Result<serde_json::Value> {
            self.urls.lock().unwrap().push(api_url.to_string());
            Ok(self.body.clone())
        }
    }

    #[tokio::test]
    async fn test_classify_rewrites_url() {
        let backend = Arc::new(RecordingBackend {
            urls: Mutex::new(Vec::new()),
            body: json!({"state": "open", "draft": true}),
        });
        let classifier =
            PullRequestClassifier::new(backend.clone(), &PullRequestSettings::default()).unwrap();

        let state = classifier.classify(REF).await.unwrap();

        assert_eq!(state, PullRequestState::Draft);
        assert_eq!(
            *backend.urls.lock().unwrap(),
            vec!["https://api.github.com/repos/org/repo/pulls/42".to_string()]
        );
    }

    #[tokio::test]
    async fn test_invalid_reference_makes_no_request() {
        let backend = Arc::new(RecordingBackend {
            urls: Mutex::new(Vec::new()),
            body: json!({}),
        });
        let classifier =
            PullRequestClassifier::new(backend.clone(), &PullRequestSettings::default()).unwrap();

        assert!(classifier
            .classify("https://github.com/openshift/repo/pull/1")
            .await
            .is_err());
        assert!(backend.urls.lock().unwrap().is_empty());
    }
}
