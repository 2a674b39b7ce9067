//! Classification of raw events into activity events.
//!
//! Only four payload types carry activity worth reporting: issue and pull
//! request lifecycle events, and comments on either. Everything else is
//! discarded.

use crate::activity::ActivityEvent;
use crate::activity_kind::ActivityKind;
use crate::event::{DecodeError, Payload, RawEvent, Subject};

const ISSUES_EVENT: &str = "IssuesEvent";
const PULL_REQUEST_EVENT: &str = "PullRequestEvent";
const ISSUE_COMMENT_EVENT: &str = "IssueCommentEvent";
const REVIEW_COMMENT_EVENT: &str = "PullRequestReviewCommentEvent";

/// Classifies one raw event.
///
/// Returns `Ok(None)` for events that are not interesting. A payload that
/// cannot be decoded, or that lacks a field the rule for its type reads, is
/// an error.
pub fn classify(event: &RawEvent) -> Result<Option<ActivityEvent>, DecodeError> {
    let (kind, number, title) = match event.payload()? {
        Payload::Issues(payload) => {
            let issue = require(payload.issue, ISSUES_EVENT, "issue")?;
            let (number, title) = number_and_title(&issue, ISSUES_EVENT)?;
            let kind = match require(payload.action, ISSUES_EVENT, "action")?.as_str() {
                "opened" => ActivityKind::OpenedIssue,
                "closed" => ActivityKind::ClosedIssue,
                _ => ActivityKind::NonInteresting,
            };
            (kind, number, title)
        }
        Payload::PullRequest(payload) => {
            let pr = require(payload.pull_request, PULL_REQUEST_EVENT, "pull_request")?;
            let (number, title) = number_and_title(&pr, PULL_REQUEST_EVENT)?;
            let kind = match require(payload.action, PULL_REQUEST_EVENT, "action")?.as_str() {
                "opened" => ActivityKind::OpenedPullRequest,
                "reopened" => ActivityKind::ReopenedPullRequest,
                "edited" => ActivityKind::EditedPullRequest,
                "closed" => {
                    if require(pr.merged, PULL_REQUEST_EVENT, "pull_request.merged")? {
                        ActivityKind::MergedPullRequest
                    } else {
                        ActivityKind::ClosedPullRequest
                    }
                }
                _ => ActivityKind::NonInteresting,
            };
            (kind, number, title)
        }
        Payload::IssueComment(payload) => {
            let issue = require(payload.issue, ISSUE_COMMENT_EVENT, "issue")?;
            let (number, title) = number_and_title(&issue, ISSUE_COMMENT_EVENT)?;
            (ActivityKind::CommentedIssue, number, title)
        }
        Payload::PullRequestReviewComment(payload) => {
            let pr = require(payload.pull_request, REVIEW_COMMENT_EVENT, "pull_request")?;
            let (number, title) = number_and_title(&pr, REVIEW_COMMENT_EVENT)?;
            (ActivityKind::CommentedPullRequest, number, title)
        }
        Payload::Unrecognized => return Ok(None),
    };

    Ok(ActivityEvent::new(
        kind,
        event.repo.name.as_str(),
        number,
        title,
        event.created_at,
    ))
}

fn number_and_title(
    subject: &Subject,
    event_type: &'static str,
) -> Result<(u64, String), DecodeError> {
    let number = require(subject.number, event_type, "number")?;
    let title = require(subject.title.clone(), event_type, "title")?;
    Ok((number, title))
}

fn require<T>(
    value: Option<T>,
    event_type: &'static str,
    field: &'static str,
) -> Result<T, DecodeError> {
    value.ok_or(DecodeError::MissingField { event_type, field })
}
