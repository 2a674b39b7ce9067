//! CLI command implementations.

pub mod activity;
pub mod util;
