//! Heavy strategy: render the page in a headless browser.

use std::time::Duration;

use async_trait::async_trait;

use super::{FetchStrategy, StrategyKind};
use crate::error::FetchError;
use crate::user_agent::{random_user_agent, ACCEPT_LANGUAGE, BROWSER_LOCALE};

/// Upper bound on session teardown; a session still closing after this is
/// dropped, which kills its browser process.
const SESSION_CLOSE_TIMEOUT: Duration = Duration::from_secs(10);

/// Subresources that are never loaded while rendering.
const BLOCKED_URL_PATTERNS: &[&str] = &[
    "*.png", "*.jpg", "*.jpeg", "*.gif", "*.svg", "*.webp", "*.ico", "*.woff", "*.woff2", "*.ttf",
    "*.otf",
];

/// Per-session identity and rendering knobs.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    pub user_agent: String,
    pub locale: String,
    pub accept_language: String,
    pub blocked_url_patterns: Vec<String>,
    /// Wait after DOM readiness before the HTML is captured.
    pub settle: Duration,
}

impl SessionOptions {
    /// Options with a freshly rotated user-agent.
    #[must_use]
    pub fn randomized(settle: Duration) -> Self {
        Self {
            user_agent: random_user_agent().to_owned(),
            locale: BROWSER_LOCALE.to_owned(),
            accept_language: ACCEPT_LANGUAGE.to_owned(),
            blocked_url_patterns: BLOCKED_URL_PATTERNS
                .iter()
                .map(|p| (*p).to_owned())
                .collect(),
            settle,
        }
    }
}

/// Starts isolated browser sessions.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    /// # Errors
    ///
    /// Returns [`FetchError::Render`] if the browser cannot be started, or
    /// [`FetchError::BrowserUnavailable`] if rendering is switched off.
    async fn launch(&self, options: &SessionOptions) -> Result<Box<dyn BrowserSession>, FetchError>;
}

/// One isolated browser session, used for a single URL.
#[async_trait]
pub trait BrowserSession: Send {
    /// Navigates to `url`, waits for DOM readiness plus the settle delay, and
    /// returns the rendered HTML.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Render`] on navigation or capture failure.
    async fn render(&mut self, url: &str) -> Result<String, FetchError>;

    /// Releases every resource held by the session.
    async fn close(self: Box<Self>);
}

/// Heavy strategy over any [`BrowserLauncher`].
///
/// Each call launches its own session and closes it before returning,
/// whatever the outcome of the render. `timeout` bounds navigation and
/// capture; the settle delay is added on top of it, so the render deadline
/// is `timeout + settle`. Teardown has its own bound.
pub struct BrowserStrategy<L> {
    launcher: L,
    timeout: Duration,
    settle: Duration,
    close_timeout: Duration,
}

impl<L: BrowserLauncher> BrowserStrategy<L> {
    #[must_use]
    pub fn new(launcher: L, timeout: Duration, settle: Duration) -> Self {
        Self {
            launcher,
            timeout,
            settle,
            close_timeout: SESSION_CLOSE_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_close_timeout(mut self, close_timeout: Duration) -> Self {
        self.close_timeout = close_timeout;
        self
    }

    fn render_deadline(&self) -> Duration {
        self.timeout.saturating_add(self.settle)
    }
}

#[async_trait]
impl<L: BrowserLauncher> FetchStrategy for BrowserStrategy<L> {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Heavy
    }

    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let options = SessionOptions::randomized(self.settle);
        let mut session = self.launcher.launch(&options).await?;

        let deadline = self.render_deadline();
        let rendered = tokio::time::timeout(deadline, session.render(url)).await;
        if tokio::time::timeout(self.close_timeout, session.close())
            .await
            .is_err()
        {
            tracing::warn!(
                url,
                close_timeout_ms = self.close_timeout.as_millis(),
                "browser session did not close in time; dropped"
            );
        }

        rendered.unwrap_or_else(|_| {
            Err(FetchError::Timeout {
                url: url.to_owned(),
                secs: deadline.as_secs_f64(),
            })
        })
    }
}

/// Launcher used when headless rendering is switched off.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledBrowser;

#[async_trait]
impl BrowserLauncher for DisabledBrowser {
    async fn launch(
        &self,
        _options: &SessionOptions,
    ) -> Result<Box<dyn BrowserSession>, FetchError> {
        Err(FetchError::BrowserUnavailable)
    }
}
