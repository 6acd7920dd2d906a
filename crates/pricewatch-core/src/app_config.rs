use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration loaded once from the environment and threaded
/// explicitly into the extractor and the CLI.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub log_level: String,
    pub products_path: PathBuf,
    /// Pacing delay applied once before every extraction, in seconds.
    pub scrape_delay_secs: f64,
    /// Timeout applied to each fetch strategy, in seconds. The heavy strategy
    /// adds `render_settle_ms` on top of it.
    pub request_timeout_secs: u64,
    pub max_concurrent: usize,
    /// Wait after DOM readiness so client-side rendering can finish.
    pub render_settle_ms: u64,
    pub browser_enabled: bool,
    pub chromium_path: Option<PathBuf>,
    pub check_interval_hours: u64,
}

impl AppConfig {
    #[must_use]
    pub fn scrape_delay(&self) -> Duration {
        Duration::from_secs_f64(self.scrape_delay_secs)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    #[must_use]
    pub fn render_settle(&self) -> Duration {
        Duration::from_millis(self.render_settle_ms)
    }

    #[must_use]
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_hours.saturating_mul(3600))
    }
}
