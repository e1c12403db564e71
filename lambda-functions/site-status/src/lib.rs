pub mod config;
pub mod probe;
pub mod report;

pub use config::{resolve_urls, ConfigSource, EnvConfig, ResolveError, SiteEntry, Worklist};
pub use probe::{HttpProber, ProbeOutcome, Prober};
pub use report::{build_report, Report, ReportLine};

use tracing::info;

/// Checks every configured site and produces the text report.
///
/// Holds no results between calls; configuration is read again on every
/// [`SiteStatusService::run_site_check`].
pub struct SiteStatusService<S = EnvConfig, P = HttpProber> {
    source: S,
    prober: P,
}

impl SiteStatusService {
    pub fn new() -> Self {
        Self {
            source: EnvConfig,
            prober: HttpProber::new(),
        }
    }
}

impl Default for SiteStatusService {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, P> SiteStatusService<S, P>
where
    S: ConfigSource,
    P: Prober,
{
    pub fn with_parts(source: S, prober: P) -> Self {
        Self { source, prober }
    }

    pub async fn run_site_check(&self) -> Report {
        info!("Starting site status check");
        build_report(&self.source, &self.prober).await
    }
}
