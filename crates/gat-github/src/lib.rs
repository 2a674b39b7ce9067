//! GitHub events API client for the activity tracker.
//!
//! Lists the events performed by a user, one page at a time, following the
//! pagination advertised in the `Link` response header.

use std::fmt;
use std::time::Duration;

use gat_core::{EventPage, RawEvent};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, LINK};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use thiserror::Error;

/// Public GitHub REST API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";
const CLIENT_USER_AGENT: &str = concat!("github-activity-tracker/", env!("CARGO_PKG_VERSION"));

/// GitHub client errors.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// The provided access token was invalid.
    #[error("invalid access token: {reason}")]
    InvalidAccessToken { reason: &'static str },
    /// The API base URL could not be used.
    #[error("invalid API base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// API returned an error response.
    #[error("API error ({status}): {message}")]
    Api { status: StatusCode, message: String },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// GitHub events API client.
///
/// Without an access token only public events are visible, whatever is
/// requested.
pub struct Client {
    http: reqwest::Client,
    base_url: Url,
    access_token: Option<String>,
    per_page: Option<u32>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url.as_str())
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("per_page", &self.per_page)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates an unauthenticated client for the API at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not a usable base URL, or if the HTTP
    /// client fails to build.
    pub fn new(base_url: &str) -> Result<Self, GitHubError> {
        let parsed = Url::parse(base_url).map_err(|err| GitHubError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: err.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(GitHubError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "URL cannot be a base".to_string(),
            });
        }

        // Build HTTP client with timeout
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent(CLIENT_USER_AGENT)
            .build()
            .map_err(GitHubError::ClientBuild)?;

        Ok(Self {
            http,
            base_url: parsed,
            access_token: None,
            per_page: None,
        })
    }

    /// Authenticates every request with `access_token`.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty or whitespace-only.
    pub fn with_access_token(
        mut self,
        access_token: impl Into<String>,
    ) -> Result<Self, GitHubError> {
        let access_token = access_token.into();

        if access_token.is_empty() {
            return Err(GitHubError::InvalidAccessToken {
                reason: "access token cannot be empty",
            });
        }
        if access_token.trim().is_empty() {
            return Err(GitHubError::InvalidAccessToken {
                reason: "access token cannot be whitespace-only",
            });
        }

        self.access_token = Some(access_token);
        Ok(self)
    }

    /// Requests `per_page` events per page instead of the API default.
    #[must_use]
    pub const fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    pub const fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// URL listing the events performed by `user`.
    pub fn events_url(
        &self,
        user: &str,
        public_only: bool,
        page: Option<u32>,
    ) -> Result<Url, GitHubError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| GitHubError::InvalidBaseUrl {
                    url: self.base_url.to_string(),
                    reason: "URL cannot be a base".to_string(),
                })?;
            segments.pop_if_empty().extend(["users", user, "events"]);
            if public_only {
                segments.push("public");
            }
        }

        if page.is_some() || self.per_page.is_some() {
            let mut query = url.query_pairs_mut();
            if let Some(page) = page {
                query.append_pair("page", &page.to_string());
            }
            if let Some(per_page) = self.per_page {
                query.append_pair("per_page", &per_page.to_string());
            }
        }

        Ok(url)
    }

    /// Fetches one page of events performed by `user`.
    ///
    /// `page` is `None` for the first page.
    pub async fn list_events_performed_by(
        &self,
        user: &str,
        public_only: bool,
        page: Option<u32>,
    ) -> Result<EventPage, GitHubError> {
        let url = self.events_url(user, public_only, page)?;
        tracing::debug!(%url, "requesting events");

        let mut request = self
            .http
            .get(url)
            .header(ACCEPT, GITHUB_ACCEPT)
            .header("x-github-api-version", GITHUB_API_VERSION);
        if let Some(token) = &self.access_token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = request.send().await?;
        let status = response.status();
        let next_page = next_page(response.headers());
        let body = response.text().await?;
        if !status.is_success() {
            return Err(api_error(status, body));
        }

        let events = parse_events(&body)?;
        Ok(EventPage { events, next_page })
    }
}

fn next_page(headers: &HeaderMap) -> Option<u32> {
    let link = headers.get(LINK)?.to_str().ok()?;
    parse_next_page(link)
}

/// Extracts the `page` number of the `rel="next"` entry of a `Link` header.
pub fn parse_next_page(link: &str) -> Option<u32> {
    link.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim();
        let is_next = parts.any(|param| {
            let param = param.trim();
            param == r#"rel="next""# || param == "rel=next"
        });
        if !is_next {
            return None;
        }

        let url = Url::parse(target.strip_prefix('<')?.strip_suffix('>')?).ok()?;
        url.query_pairs()
            .find(|(key, _)| key == "page")
            .and_then(|(_, value)| value.parse().ok())
            .filter(|page| *page > 0)
    })
}

fn parse_events(body: &str) -> Result<Vec<RawEvent>, GitHubError> {
    serde_json::from_str(body).map_err(|err| GitHubError::InvalidResponse(err.to_string()))
}

/// Error for a non-2xx response, falling back to the raw body when it has no
/// JSON `message`.
fn api_error(status: StatusCode, body: String) -> GitHubError {
    parse_api_error(status, &body).unwrap_or(GitHubError::Api {
        status,
        message: body,
    })
}

fn parse_api_error(status: StatusCode, body: &str) -> Option<GitHubError> {
    #[derive(Deserialize)]
    struct ErrorPayload {
        message: String,
    }

    serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .map(|payload| GitHubError::Api {
            status,
            message: payload.message,
        })
}
