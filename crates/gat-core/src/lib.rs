//! Core domain logic for the GitHub activity tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - Classification: turning raw platform events into activity events
//! - Aggregation: paging through an event source and grouping by repository and subject
//! - Rendering: formatting the grouped activity as a text report

mod activity;
pub mod activity_kind;
pub mod aggregate;
pub mod classify;
pub mod event;

pub use activity::{ActivityEvent, ActivityReport, SubjectEvents};
pub use activity_kind::ActivityKind;
pub use aggregate::{AggregateError, EventPage, EventSource, TimeWindow, aggregate_activity};
pub use classify::classify;
pub use event::{DecodeError, Payload, RawEvent};
