//! Activity kinds as the single source of truth for activity labels.

use std::fmt;

/// The kinds of activity a raw event can be classified as.
///
/// `NonInteresting` marks events that are discarded during classification;
/// it never appears in a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActivityKind {
    NonInteresting,
    OpenedIssue,
    ClosedIssue,
    CommentedIssue,
    OpenedPullRequest,
    ReopenedPullRequest,
    EditedPullRequest,
    ClosedPullRequest,
    MergedPullRequest,
    CommentedPullRequest,
}

impl ActivityKind {
    /// Human-readable label used in reports.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NonInteresting => "non interesting",
            Self::OpenedIssue => "opened issue",
            Self::ClosedIssue => "closed issue",
            Self::CommentedIssue => "commented issue",
            Self::OpenedPullRequest => "opened pull request",
            Self::ReopenedPullRequest => "reopened pull request",
            Self::EditedPullRequest => "edited pull request",
            Self::ClosedPullRequest => "closed pull request",
            Self::MergedPullRequest => "merged pull request",
            Self::CommentedPullRequest => "commented pull request",
        }
    }

    /// Whether events of this kind are kept in a report.
    #[must_use]
    pub const fn is_interesting(&self) -> bool {
        !matches!(self, Self::NonInteresting)
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_match_display() {
        let variants = [
            ActivityKind::NonInteresting,
            ActivityKind::OpenedIssue,
            ActivityKind::ClosedIssue,
            ActivityKind::CommentedIssue,
            ActivityKind::OpenedPullRequest,
            ActivityKind::ReopenedPullRequest,
            ActivityKind::EditedPullRequest,
            ActivityKind::ClosedPullRequest,
            ActivityKind::MergedPullRequest,
            ActivityKind::CommentedPullRequest,
        ];

        for variant in &variants {
            assert_eq!(variant.to_string(), variant.as_str());
        }
    }

    #[test]
    fn known_labels() {
        assert_eq!(ActivityKind::MergedPullRequest.as_str(), "merged pull request");
        assert_eq!(ActivityKind::CommentedIssue.to_string(), "commented issue");
    }

    #[test]
    fn only_non_interesting_is_discarded() {
        assert!(!ActivityKind::NonInteresting.is_interesting());
        assert!(ActivityKind::OpenedIssue.is_interesting());
        assert!(ActivityKind::CommentedPullRequest.is_interesting());
    }
}
