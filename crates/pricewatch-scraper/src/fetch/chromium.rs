//! Headless Chromium sessions via chromiumoxide.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{
    SetBlockedUrLsParams, SetUserAgentOverrideParams,
};
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;

use super::browser::{BrowserLauncher, BrowserSession, SessionOptions};
use crate::error::FetchError;

static SESSION_SEQ: AtomicU64 = AtomicU64::new(0);

/// Launches one Chromium process per session, each with its own throwaway
/// profile directory so no cookies or cache are shared between products.
#[derive(Debug, Clone)]
pub struct ChromiumLauncher {
    executable: Option<PathBuf>,
    launch_timeout: Duration,
}

impl ChromiumLauncher {
    /// `executable` overrides chromiumoxide's own browser discovery.
    #[must_use]
    pub fn new(executable: Option<PathBuf>, launch_timeout: Duration) -> Self {
        Self {
            executable,
            launch_timeout,
        }
    }
}

/// Throwaway Chromium profile directory, removed when dropped.
///
/// Removal is best-effort and blocking; it also runs when launch fails or the
/// owning session is dropped without `close`.
#[derive(Debug)]
struct ProfileDir(PathBuf);

impl ProfileDir {
    fn unique() -> Self {
        Self(std::env::temp_dir().join(format!(
            "pricewatch-chromium-{}-{}",
            std::process::id(),
            SESSION_SEQ.fetch_add(1, Ordering::Relaxed)
        )))
    }

    fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for ProfileDir {
    fn drop(&mut self) {
        match std::fs::remove_dir_all(&self.0) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::debug!(
                path = %self.0.display(),
                error = %e,
                "failed to remove chromium profile dir"
            ),
        }
    }
}

fn render_err(context: &str, err: impl std::fmt::Display) -> FetchError {
    FetchError::Render(format!("{context}: {err}"))
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    async fn launch(&self, options: &SessionOptions) -> Result<Box<dyn BrowserSession>, FetchError> {
        let profile_dir = ProfileDir::unique();

        let mut builder = BrowserConfig::builder()
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking")
            .arg(format!("--lang={}", options.locale))
            .arg(format!("--user-agent={}", options.user_agent))
            .user_data_dir(profile_dir.path())
            .launch_timeout(self.launch_timeout);
        if let Some(path) = &self.executable {
            builder = builder.chrome_executable(path);
        }
        let config = builder
            .build()
            .map_err(|e| render_err("invalid browser config", e))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| render_err("failed to launch chromium", e))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        Ok(Box::new(ChromiumSession {
            browser,
            handler,
            options: options.clone(),
            profile_dir,
        }))
    }
}

// Fields drop in declaration order: the browser process is killed before its
// profile directory is removed.
struct ChromiumSession {
    browser: Browser,
    handler: JoinHandle<()>,
    options: SessionOptions,
    profile_dir: ProfileDir,
}

impl ChromiumSession {
    async fn render_on(&self, page: &Page, url: &str) -> Result<String, FetchError> {
        let user_agent = SetUserAgentOverrideParams::builder()
            .user_agent(self.options.user_agent.clone())
            .accept_language(self.options.accept_language.clone())
            .build()
            .map_err(|e| render_err("invalid user agent override", e))?;
        page.execute(user_agent)
            .await
            .map_err(|e| render_err("user agent override failed", e))?;

        page.execute(SetBlockedUrLsParams::new(
            self.options.blocked_url_patterns.clone(),
        ))
        .await
        .map_err(|e| render_err("resource blocking failed", e))?;

        page.goto(url)
            .await
            .map_err(|e| render_err("navigation failed", e))?;
        if let Err(e) = page.wait_for_navigation().await {
            tracing::debug!(url, error = %e, "wait for navigation failed; capturing anyway");
        }

        tokio::time::sleep(self.options.settle).await;

        page.content()
            .await
            .map_err(|e| render_err("failed to capture html", e))
    }
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn render(&mut self, url: &str) -> Result<String, FetchError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| render_err("failed to open page", e))?;

        let rendered = self.render_on(&page, url).await;
        if let Err(e) = page.close().await {
            tracing::debug!(error = %e, "failed to close page");
        }
        rendered
    }

    async fn close(self: Box<Self>) {
        let mut session = *self;
        if let Err(e) = session.browser.close().await {
            tracing::debug!(error = %e, "chromium close failed");
        }
        if let Err(e) = session.browser.wait().await {
            tracing::debug!(error = %e, "chromium did not exit cleanly");
        }
        session.handler.abort();
        tracing::debug!(path = %session.profile_dir.path().display(), "chromium session closed");
    }
}

impl Drop for ChromiumSession {
    // Dropping `Browser` kills the child process; the profile dir goes with
    // the `ProfileDir` field.
    fn drop(&mut self) {
        self.handler.abort();
    }
}
