//! Command-line argument definitions.

use std::path::PathBuf;

use clap::Parser;

/// Generates a report for a user's GitHub activity.
///
/// Pages through the events performed by the user and groups issue and pull
/// request activity by repository and subject.
#[derive(Debug, Parser)]
#[command(name = "github-activity-tracker", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// GitHub user to report on (overrides the configured user).
    #[arg(short, long)]
    pub user: Option<String>,

    /// Start of the report window, ISO 8601 or relative (e.g., '2 days ago').
    ///
    /// Validated but not yet applied to the fetched events.
    #[arg(short, long)]
    pub since: Option<String>,

    /// End of the report window, ISO 8601 or relative.
    ///
    /// Validated but not yet applied to the fetched events.
    #[arg(short, long)]
    pub to: Option<String>,

    /// GitHub access token for private user history (optional).
    #[arg(short, long)]
    pub access_token: Option<String>,

    /// Include private events (requires an access token).
    #[arg(long)]
    pub include_private: bool,
}
