//! Activity command for reporting a user's GitHub activity.
//!
//! Validates the request, pages through the user's events and prints the
//! report grouped by repository and subject.

use std::io::Write;

use anyhow::{Context, Result, bail};
use gat_core::{EventPage, EventSource, TimeWindow, aggregate_activity};
use gat_github::{Client, GitHubError};
use tokio::runtime::Runtime;

use crate::commands::util::parse_datetime;
use crate::{Cli, Config};

/// Largest page size the events API accepts.
const MAX_PER_PAGE: u32 = 100;

/// Validated inputs for one report run.
#[derive(Clone, PartialEq, Eq)]
pub struct ActivityRequest {
    pub user: String,
    pub public_only: bool,
    pub window: TimeWindow,
    pub access_token: Option<String>,
}

impl std::fmt::Debug for ActivityRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityRequest")
            .field("user", &self.user)
            .field("public_only", &self.public_only)
            .field("window", &self.window)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl ActivityRequest {
    /// Resolves command-line flags against the configuration.
    ///
    /// Fails on missing or malformed input, before any network activity.
    pub fn from_cli(cli: &Cli, config: &Config) -> Result<Self> {
        let user = cli
            .user
            .as_deref()
            .or(config.user.as_deref())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!("missing GitHub user (pass --user or set GAT_USER or config.toml)")
            })?
            .to_string();

        let since = parse_timestamp(cli.since.as_deref(), "since")?;
        let to = parse_timestamp(cli.to.as_deref(), "to")?;
        if let (Some(since), Some(to)) = (since, to) {
            if since > to {
                bail!("--since ({since}) must not be later than --to ({to})");
            }
        }

        let access_token = cli
            .access_token
            .clone()
            .or_else(|| config.access_token.clone());

        Ok(Self {
            user,
            public_only: !cli.include_private,
            window: TimeWindow::new(since, to),
            access_token,
        })
    }
}

fn parse_timestamp(
    s: Option<&str>,
    name: &str,
) -> Result<Option<chrono::DateTime<chrono::Utc>>> {
    s.map(|s| parse_datetime(s).with_context(|| format!("invalid --{name} timestamp")))
        .transpose()
}

/// Event source that drives the async GitHub client on a current-thread runtime.
struct GitHubEventSource {
    client: Client,
    runtime: Runtime,
}

impl EventSource for GitHubEventSource {
    type Error = GitHubError;

    fn fetch_page(
        &mut self,
        user: &str,
        public_only: bool,
        page: Option<u32>,
    ) -> Result<EventPage, GitHubError> {
        self.runtime
            .block_on(self.client.list_events_performed_by(user, public_only, page))
    }
}

fn build_client(request: &ActivityRequest, config: &Config) -> Result<Client> {
    let mut client =
        Client::new(&config.api_base_url).context("failed to create GitHub client")?;

    if let Some(token) = &request.access_token {
        client = client
            .with_access_token(token.clone())
            .context("failed to configure GitHub access token")?;
    }

    if let Some(per_page) = config.per_page {
        if !(1..=MAX_PER_PAGE).contains(&per_page) {
            bail!("per_page must be between 1 and {MAX_PER_PAGE}, got {per_page}");
        }
        client = client.with_per_page(per_page);
    }

    if !request.public_only && !client.is_authenticated() {
        tracing::warn!("private events need an access token; only public events will be listed");
    }

    Ok(client)
}

/// Runs the activity command against the GitHub API.
pub fn run<W: Write>(writer: &mut W, request: &ActivityRequest, config: &Config) -> Result<()> {
    let client = build_client(request, config)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to initialize tokio runtime")?;

    let mut source = GitHubEventSource { client, runtime };
    write_report(writer, &mut source, request)
}

/// Aggregates the user's activity from `source` and writes the report.
///
/// Nothing is written unless the whole history was fetched and classified.
pub fn write_report<W, S>(writer: &mut W, source: &mut S, request: &ActivityRequest) -> Result<()>
where
    W: Write,
    S: EventSource,
{
    let report = aggregate_activity(source, &request.user, request.public_only, &request.window)
        .with_context(|| format!("failed to fetch activity for {}", request.user))?;

    if report.is_empty() {
        writeln!(writer, "No activity found for {}.", request.user)?;
    } else {
        write!(writer, "{report}")?;
    }
    Ok(())
}
