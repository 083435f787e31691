use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use super::errors::WatchError;

/// Listing - one classified ad as returned by the fetcher.
///
/// `id` is the stable identifier deduplication keys on; `title` is what
/// filters match against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    pub title: String,
    pub link: String,
}

impl Listing {
    pub fn new(id: impl Into<String>, title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            link: link.into(),
        }
    }

    /// Notification text for this listing.
    pub fn render(&self) -> String {
        format!("{}\n{}", self.title, self.link)
    }
}

/// Target - one monitored search link plus its seen-item bookkeeping.
///
/// The constructor validates the url; an invalid link never produces a
/// `Target`. `seen` grows monotonically: every fetched id is absorbed,
/// so a listing that disappears and reappears is not re-notified.
#[derive(Debug, Clone)]
pub struct Target {
    name: String,
    url: String,
    seen: HashSet<String>,
    primed: bool,
    last_checked_at: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

impl Target {
    /// Create a target, validating the url (http/https with a host).
    pub fn new(name: impl Into<String>, url: &str) -> Result<Self, WatchError> {
        let parsed =
            Url::parse(url).map_err(|e| WatchError::InvalidTarget(format!("{url} ({e})")))?;

        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(WatchError::InvalidTarget(format!(
                "{url} (expected an http(s) link)"
            )));
        }

        Ok(Self {
            name: name.into(),
            url: url.to_string(),
            seen: HashSet::new(),
            primed: false,
            last_checked_at: None,
            last_error: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Number of item ids this target has observed so far.
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    /// Whether the target has completed its first scan.
    pub fn is_primed(&self) -> bool {
        self.primed
    }

    pub fn last_checked_at(&self) -> Option<DateTime<Utc>> {
        self.last_checked_at
    }

    /// Error message from the most recent failed fetch, cleared by the
    /// next successful one.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn record_success(&mut self) {
        self.last_checked_at = Some(Utc::now());
        self.last_error = None;
    }

    pub fn record_failure(&mut self, error: String) {
        self.last_checked_at = Some(Utc::now());
        self.last_error = Some(error);
    }

    /// Fold a fetched item set into `seen` and return the listings that
    /// were not seen before, in fetch order.
    ///
    /// The first scan seeds `seen` and returns nothing: the initial
    /// item set is pre-existing inventory, not news. Ids duplicated
    /// within one fetch are reported once.
    pub fn absorb(&mut self, listings: Vec<Listing>) -> Vec<Listing> {
        let first_scan = !self.primed;
        self.primed = true;

        let mut fresh = Vec::new();
        for listing in listings {
            if self.seen.insert(listing.id.clone()) && !first_scan {
                fresh.push(listing);
            }
        }
        fresh
    }
}

/// FilterSet - substrings that suppress notifications.
///
/// Matching is case-insensitive. Insertion order is kept for display;
/// duplicates are allowed but have no additional effect. An empty set
/// matches nothing, so every listing passes through.
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    filters: Vec<String>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, filter: impl Into<String>) {
        self.filters.push(filter.into());
    }

    pub fn clear(&mut self) {
        self.filters.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.filters
    }

    /// True if any filter occurs in `text` (case-insensitive).
    pub fn matches(&self, text: &str) -> bool {
        let haystack = text.to_lowercase();
        self.filters
            .iter()
            .any(|filter| haystack.contains(&filter.to_lowercase()))
    }
}
