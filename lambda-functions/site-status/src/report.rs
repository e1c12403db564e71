use std::fmt;

use tracing::{error, info};

use crate::config::{resolve_urls, ConfigSource, ResolveError};
use crate::probe::{ProbeOutcome, Prober};

pub const BANNER: &str = "FUNCTION OUTPUT:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub url: String,
    pub outcome: ProbeOutcome,
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            ProbeOutcome::Ok(status) => write!(f, "SITE: {} - RESULT: Ok - {}", self.url, status),
            ProbeOutcome::Error(reason) => {
                write!(f, "SITE: {} - RESULT: Error - {}", self.url, reason)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    /// One line per worklist entry, in worklist order.
    Lines(Vec<ReportLine>),
    /// Nothing to probe.
    Error(ResolveError),
}

impl Report {
    pub fn lines(&self) -> &[ReportLine] {
        match self {
            Self::Lines(lines) => lines,
            Self::Error(_) => &[],
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lines(lines) => {
                write!(f, "{BANNER}\n\n")?;
                for (i, line) in lines.iter().enumerate() {
                    if i > 0 {
                        f.write_str("\n")?;
                    }
                    write!(f, "{line}")?;
                }
                Ok(())
            }
            Self::Error(e) => write!(f, "ERROR: {e}"),
        }
    }
}

/// Resolves the worklist and probes every entry in order.
///
/// A failed probe is recorded as an error line and the next site is still
/// checked. An empty worklist short-circuits before any request is made.
pub async fn build_report<S, P>(source: &S, prober: &P) -> Report
where
    S: ConfigSource + ?Sized,
    P: Prober,
{
    let (worklist, resolve_error) = resolve_urls(source);

    if worklist.is_empty() {
        let e = resolve_error.unwrap_or(ResolveError::NoUrls { invalid: None });
        error!("No sites to check: {}", e);
        return Report::Error(e);
    }

    let mut lines = Vec::with_capacity(worklist.len());
    for entry in worklist.entries() {
        let outcome = prober.probe(&entry.url).await;
        lines.push(ReportLine {
            url: entry.url.clone(),
            outcome,
        });
    }

    let report = Report::Lines(lines);
    let checked = report.lines();
    let failed = checked.iter().filter(|line| !line.outcome.is_ok()).count();
    info!("Checked {} site(s), {} failed", checked.len(), failed);

    report
}
