//! Paging through an event source and grouping the classified events.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::activity::ActivityReport;
use crate::classify::classify;
use crate::event::{DecodeError, RawEvent};

/// One batch of events and the page that follows it, if any.
#[derive(Debug, Clone, Default)]
pub struct EventPage {
    pub events: Vec<RawEvent>,
    pub next_page: Option<u32>,
}

/// A paginated source of raw events performed by a user.
///
/// Pages are requested one at a time and each call blocks until its page
/// arrives. There is no cancellation hook: a run can only be abandoned by
/// making `fetch_page` fail (or by ending the process), which aborts it like
/// any other source error.
pub trait EventSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetches one page. `page` is `None` for the first page.
    fn fetch_page(
        &mut self,
        user: &str,
        public_only: bool,
        page: Option<u32>,
    ) -> Result<EventPage, Self::Error>;
}

/// Errors that abort an aggregation run.
#[derive(Debug, Error)]
pub enum AggregateError<E: std::error::Error + 'static> {
    /// The event source failed to deliver a page.
    #[error("failed to fetch page {page} of events")]
    Source {
        page: u32,
        #[source]
        source: E,
    },

    /// An event on a fetched page could not be classified.
    #[error("failed to classify event")]
    Decode(#[from] DecodeError),
}

/// Optional bounds on when events happened.
///
/// Accepted and carried through aggregation but not used to filter events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeWindow {
    pub since: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl TimeWindow {
    pub const fn new(since: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        Self { since, to }
    }

    pub const fn is_bounded(&self) -> bool {
        self.since.is_some() || self.to.is_some()
    }
}

/// Builds the activity report for `user` by reading every page of `source`.
///
/// Pages are requested one after another until the source reports no next
/// page. Any source or classification failure aborts the run and nothing
/// collected so far is returned.
pub fn aggregate_activity<S: EventSource>(
    source: &mut S,
    user: &str,
    public_only: bool,
    window: &TimeWindow,
) -> Result<ActivityReport, AggregateError<S::Error>> {
    if window.is_bounded() {
        tracing::warn!(
            since = ?window.since,
            to = ?window.to,
            "time window is not applied to fetched events"
        );
    }

    let mut report = ActivityReport::new();
    let mut page = None;
    let mut pages = 0_usize;
    let mut discarded = 0_usize;

    loop {
        let page_number = page.unwrap_or(1);
        let EventPage { events, next_page } = source
            .fetch_page(user, public_only, page)
            .map_err(|source| AggregateError::Source {
                page: page_number,
                source,
            })?;
        pages += 1;
        tracing::debug!(page = page_number, events = events.len(), ?next_page, "fetched page");

        for raw in &events {
            match classify(raw)? {
                Some(event) => report.record(event),
                None => {
                    discarded += 1;
                    tracing::trace!(event_type = %raw.event_type, id = ?raw.id, "discarded event");
                }
            }
        }

        match next_page {
            Some(next) if next > 0 => page = Some(next),
            _ => break,
        }
    }

    tracing::info!(
        user,
        pages,
        kept = report.event_count(),
        discarded,
        "aggregated activity"
    );
    Ok(report)
}
