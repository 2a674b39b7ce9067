//! Raw activity events as returned by the platform's events API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while decoding an event payload.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The payload did not match the shape expected for its event type.
    #[error("malformed {event_type} payload: {source}")]
    Payload {
        event_type: String,
        #[source]
        source: serde_json::Error,
    },

    /// A field needed for classification was absent or null.
    #[error("{event_type} payload is missing `{field}`")]
    MissingField {
        event_type: &'static str,
        field: &'static str,
    },
}

/// The repository an event happened in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
    /// Full repository name, e.g. `owner/name`.
    pub name: String,
}

/// One undecoded event from the platform.
///
/// The payload is kept as JSON until [`RawEvent::payload`] is called; its shape
/// depends on `event_type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Platform event type, e.g. `IssuesEvent`.
    #[serde(rename = "type")]
    pub event_type: String,
    pub repo: RepoRef,
    #[serde(default)]
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl RawEvent {
    /// Creates an event without an ID.
    pub fn new(
        event_type: impl Into<String>,
        repo_name: impl Into<String>,
        created_at: DateTime<Utc>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            id: None,
            event_type: event_type.into(),
            repo: RepoRef {
                name: repo_name.into(),
            },
            payload,
            created_at,
        }
    }

    /// Decodes the payload into the shape selected by the event type.
    ///
    /// Event types outside the recognized set decode to
    /// [`Payload::Unrecognized`] without looking at the payload.
    pub fn payload(&self) -> Result<Payload, DecodeError> {
        let payload = match self.event_type.as_str() {
            "IssuesEvent" => Payload::Issues(self.decode()?),
            "PullRequestEvent" => Payload::PullRequest(self.decode()?),
            "IssueCommentEvent" => Payload::IssueComment(self.decode()?),
            "PullRequestReviewCommentEvent" => Payload::PullRequestReviewComment(self.decode()?),
            _ => Payload::Unrecognized,
        };
        Ok(payload)
    }

    fn decode<T: for<'de> Deserialize<'de>>(&self) -> Result<T, DecodeError> {
        T::deserialize(&self.payload).map_err(|source| DecodeError::Payload {
            event_type: self.event_type.clone(),
            source,
        })
    }
}

/// A decoded event payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Issues(IssuesPayload),
    PullRequest(PullRequestPayload),
    IssueComment(IssueCommentPayload),
    PullRequestReviewComment(ReviewCommentPayload),
    /// Any event type the tracker does not report on.
    Unrecognized,
}

/// An issue or pull request as embedded in a payload.
///
/// `merged` is only sent for pull requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Subject {
    pub number: Option<u64>,
    pub title: Option<String>,
    pub merged: Option<bool>,
}

/// Payload of an `IssuesEvent`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IssuesPayload {
    pub action: Option<String>,
    pub issue: Option<Subject>,
}

/// Payload of a `PullRequestEvent`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PullRequestPayload {
    pub action: Option<String>,
    pub pull_request: Option<Subject>,
}

/// Payload of an `IssueCommentEvent`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IssueCommentPayload {
    pub issue: Option<Subject>,
}

/// Payload of a `PullRequestReviewCommentEvent`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReviewCommentPayload {
    pub pull_request: Option<Subject>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_platform_event() {
        let json = r#"{
            "id": "123",
            "type": "IssuesEvent",
            "actor": {"login": "octocat"},
            "repo": {"id": 1, "name": "octocat/hello-world"},
            "payload": {"action": "opened", "issue": {"number": 5, "title": "Fix bug"}},
            "public": true,
            "created_at": "2019-02-26T10:00:00Z"
        }"#;

        let event: RawEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.id.as_deref(), Some("123"));
        assert_eq!(event.event_type, "IssuesEvent");
        assert_eq!(event.repo.name, "octocat/hello-world");

        let Payload::Issues(payload) = event.payload().unwrap() else {
            panic!("expected issues payload");
        };
        assert_eq!(payload.action.as_deref(), Some("opened"));
        let issue = payload.issue.unwrap();
        assert_eq!(issue.number, Some(5));
        assert_eq!(issue.title.as_deref(), Some("Fix bug"));
    }

    #[test]
    fn unknown_type_is_unrecognized() {
        let event = RawEvent::new(
            "PushEvent",
            "o/r",
            Utc::now(),
            json!({"ref": "refs/heads/main", "size": 3}),
        );
        assert_eq!(event.payload().unwrap(), Payload::Unrecognized);
    }

    #[test]
    fn wrongly_typed_payload_is_an_error() {
        let event = RawEvent::new(
            "PullRequestEvent",
            "o/r",
            Utc::now(),
            json!({"action": "opened", "pull_request": {"number": "nine"}}),
        );
        let err = event.payload().unwrap_err();
        assert!(matches!(err, DecodeError::Payload { .. }));
        assert!(err.to_string().starts_with("malformed PullRequestEvent payload"));
    }

    #[test]
    fn missing_created_at_fails_to_deserialize() {
        let json = r#"{"type": "IssuesEvent", "repo": {"name": "o/r"}, "payload": {}}"#;
        let result: Result<RawEvent, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
