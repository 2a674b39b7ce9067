//! Classified activity events and the grouped report built from them.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::activity_kind::ActivityKind;

/// One interesting occurrence on an issue or pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEvent {
    kind: ActivityKind,
    repo_name: String,
    subject_id: u64,
    subject_title: String,
    created_at: DateTime<Utc>,
}

impl ActivityEvent {
    /// Creates an event, or `None` when `kind` is [`ActivityKind::NonInteresting`].
    pub fn new(
        kind: ActivityKind,
        repo_name: impl Into<String>,
        subject_id: u64,
        subject_title: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Option<Self> {
        if !kind.is_interesting() {
            return None;
        }
        Some(Self {
            kind,
            repo_name: repo_name.into(),
            subject_id,
            subject_title: subject_title.into(),
            created_at,
        })
    }

    pub const fn kind(&self) -> ActivityKind {
        self.kind
    }

    pub fn repo_name(&self) -> &str {
        &self.repo_name
    }

    /// Issue or pull request number, unique only within its repository.
    pub const fn subject_id(&self) -> u64 {
        self.subject_id
    }

    pub fn subject_title(&self) -> &str {
        &self.subject_title
    }

    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl fmt::Display for ActivityEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] (#{}) {}",
            self.kind, self.repo_name, self.subject_id, self.subject_title
        )
    }
}

/// Events for one repository, keyed by subject number, in arrival order.
pub type SubjectEvents = BTreeMap<u64, Vec<ActivityEvent>>;

/// Activity grouped by repository, then by subject.
///
/// Subject titles are tracked by subject number alone, so two repositories
/// sharing a number also share a title entry; the last title recorded wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityReport {
    by_repo: BTreeMap<String, SubjectEvents>,
    subject_titles: HashMap<u64, String>,
}

impl ActivityReport {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event to its subject and makes its title the current one.
    pub(crate) fn record(&mut self, event: ActivityEvent) {
        self.subject_titles
            .insert(event.subject_id, event.subject_title.clone());
        self.by_repo
            .entry(event.repo_name.clone())
            .or_default()
            .entry(event.subject_id)
            .or_default()
            .push(event);
    }

    pub fn is_empty(&self) -> bool {
        self.by_repo.is_empty()
    }

    /// Total number of events across all repositories.
    pub fn event_count(&self) -> usize {
        self.by_repo
            .values()
            .flat_map(BTreeMap::values)
            .map(Vec::len)
            .sum()
    }

    /// Repositories with their subjects, ordered by repository name.
    pub fn repositories(&self) -> impl Iterator<Item = (&str, &SubjectEvents)> {
        self.by_repo
            .iter()
            .map(|(name, subjects)| (name.as_str(), subjects))
    }

    /// Events recorded for a subject in a repository, oldest recorded first.
    pub fn events(&self, repo_name: &str, subject_id: u64) -> Option<&[ActivityEvent]> {
        self.by_repo
            .get(repo_name)?
            .get(&subject_id)
            .map(Vec::as_slice)
    }

    /// Most recently recorded title for a subject number.
    pub fn subject_title(&self, subject_id: u64) -> Option<&str> {
        self.subject_titles.get(&subject_id).map(String::as_str)
    }
}

/// Renders the report: one section per repository, one subsection per
/// subject, and each subject's events newest-recorded first.
impl fmt::Display for ActivityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (repo, subjects) in self.repositories() {
            writeln!(f, "- {repo}:")?;
            for (subject_id, events) in subjects {
                let title = self.subject_title(*subject_id).unwrap_or_default();
                writeln!(f, "  * (#{subject_id}) {title}:")?;
                for event in events.iter().rev() {
                    writeln!(
                        f,
                        "    -> {event} at {}",
                        event.created_at.to_rfc3339_opts(SecondsFormat::Secs, true)
                    )?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use insta::assert_snapshot;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2019, 2, 26, hour, 0, 0).unwrap()
    }

    fn event(kind: ActivityKind, repo: &str, id: u64, title: &str, hour: u32) -> ActivityEvent {
        ActivityEvent::new(kind, repo, id, title, at(hour)).unwrap()
    }

    #[test]
    fn non_interesting_events_cannot_be_built() {
        assert!(ActivityEvent::new(ActivityKind::NonInteresting, "r", 1, "t", at(0)).is_none());
    }

    #[test]
    fn event_display() {
        let ev = event(ActivityKind::OpenedIssue, "o/r", 5, "Fix bug", 9);
        assert_eq!(ev.to_string(), "opened issue [o/r] (#5) Fix bug");
    }

    #[test]
    fn record_preserves_arrival_order() {
        let mut report = ActivityReport::new();
        report.record(event(ActivityKind::CommentedPullRequest, "r1", 9, "B", 12));
        report.record(event(ActivityKind::OpenedPullRequest, "r1", 9, "A", 10));

        let kinds: Vec<_> = report
            .events("r1", 9)
            .unwrap()
            .iter()
            .map(ActivityEvent::kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                ActivityKind::CommentedPullRequest,
                ActivityKind::OpenedPullRequest
            ]
        );
        assert_eq!(report.subject_title(9), Some("A"));
        assert_eq!(report.event_count(), 2);
    }

    #[test]
    fn titles_are_shared_across_repositories() {
        let mut report = ActivityReport::new();
        report.record(event(ActivityKind::OpenedIssue, "r1", 9, "First", 1));
        report.record(event(ActivityKind::OpenedIssue, "r2", 9, "Second", 2));

        assert_eq!(report.subject_title(9), Some("Second"));
        assert_eq!(report.events("r1", 9).unwrap().len(), 1);
        assert_eq!(report.events("r2", 9).unwrap().len(), 1);
    }

    #[test]
    fn empty_report_renders_nothing() {
        let report = ActivityReport::new();
        assert!(report.is_empty());
        assert_eq!(report.to_string(), "");
    }

    #[test]
    fn renders_newest_recorded_first() {
        let mut report = ActivityReport::new();
        report.record(event(ActivityKind::OpenedIssue, "r1", 5, "Fix bug", 8));
        report.record(event(ActivityKind::OpenedPullRequest, "r1", 9, "Add feature", 9));
        report.record(event(ActivityKind::CommentedPullRequest, "r1", 9, "Add feature", 11));
        report.record(event(ActivityKind::MergedPullRequest, "r0", 2, "Bump deps", 7));

        assert_snapshot!(report.to_string(), @r"
- r0:
  * (#2) Bump deps:
    -> merged pull request [r0] (#2) Bump deps at 2019-02-26T07:00:00Z
- r1:
  * (#5) Fix bug:
    -> opened issue [r1] (#5) Fix bug at 2019-02-26T08:00:00Z
  * (#9) Add feature:
    -> commented pull request [r1] (#9) Add feature at 2019-02-26T11:00:00Z
    -> opened pull request [r1] (#9) Add feature at 2019-02-26T09:00:00Z
");
    }
}
