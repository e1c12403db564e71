use std::collections::HashMap;

use thiserror::Error;
use tracing::{info, warn};
use url::Url;

/// Configuration key prefix; slots are `FUNC_SITE_0` through `FUNC_SITE_9`.
pub const SITE_PREFIX: &str = "FUNC_SITE_";

/// Highest number of slots ever consulted.
pub const MAX_SITES: usize = 10;

/// A named configuration lookup, e.g. the process environment.
pub trait ConfigSource {
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads configuration from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvConfig;

impl ConfigSource for EnvConfig {
    fn get(&self, key: &str) -> Option<String> {
        // Non-unicode values are treated the same as unset ones
        std::env::var(key).ok()
    }
}

impl ConfigSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

impl<T: ConfigSource + ?Sized> ConfigSource for &T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteEntry {
    pub url: String,
    pub valid: bool,
}

impl SiteEntry {
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let valid = is_valid_url(&url);
        Self { url, valid }
    }
}

/// Sites to probe, in slot order. Invalid entries are kept so the probe
/// reports them like any other failing site.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Worklist {
    entries: Vec<SiteEntry>,
}

impl Worklist {
    pub fn entries(&self) -> &[SiteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw strings of the entries that failed validation, in slot order.
    pub fn invalid(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|entry| !entry.valid)
            .map(|entry| entry.url.as_str())
    }

    fn push(&mut self, entry: SiteEntry) {
        self.entries.push(entry);
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("one or more URLs in error: {}", .0.join(", "))]
    InvalidUrls(Vec<String>),

    #[error(
        "no valid URLs found{}",
        .invalid.as_ref().map(|e| format!(" ({e})")).unwrap_or_default()
    )]
    NoUrls { invalid: Option<Box<ResolveError>> },
}

pub fn slot_key(slot: usize) -> String {
    format!("{SITE_PREFIX}{slot}")
}

/// Absolute URLs only; relative references and bare hostnames are rejected.
pub fn is_valid_url(raw: &str) -> bool {
    Url::parse(raw).is_ok()
}

/// Builds the worklist from slots `0..MAX_SITES`, stopping at the first
/// missing slot. Slots after a gap are never read.
///
/// The error is advisory while the worklist has entries; an empty worklist
/// always comes back with [`ResolveError::NoUrls`].
pub fn resolve_urls<S>(source: &S) -> (Worklist, Option<ResolveError>)
where
    S: ConfigSource + ?Sized,
{
    let mut worklist = Worklist::default();

    for slot in 0..MAX_SITES {
        let Some(url) = source.get(&slot_key(slot)) else {
            break;
        };

        let entry = SiteEntry::new(url);
        if !entry.valid {
            warn!(slot, url = %entry.url, "Invalid site URL; it will still be probed");
        }
        worklist.push(entry);
    }

    info!("Resolved {} site(s) to check", worklist.len());

    let invalid: Vec<String> = worklist.invalid().map(str::to_string).collect();
    let mut error = (!invalid.is_empty()).then_some(ResolveError::InvalidUrls(invalid));

    if worklist.is_empty() {
        error = Some(ResolveError::NoUrls {
            invalid: error.map(Box::new),
        });
    }

    (worklist, error)
}
