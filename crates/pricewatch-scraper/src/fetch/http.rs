use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::{FetchStrategy, StrategyKind};
use crate::error::FetchError;
use crate::user_agent::{random_user_agent, ACCEPT, ACCEPT_LANGUAGE, REFERER};

const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Lightweight strategy: one HTTP GET, no JavaScript.
///
/// A new `reqwest::Client` is built for every call so no cookies or pooled
/// connections carry over between products.
#[derive(Debug, Clone)]
pub struct HttpStrategy {
    timeout: Duration,
}

impl HttpStrategy {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn build_client(&self) -> Result<Client, FetchError> {
        Ok(Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.timeout.min(MAX_CONNECT_TIMEOUT))
            .user_agent(random_user_agent())
            .build()?)
    }

    fn classify(&self, url: &str, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout {
                url: url.to_owned(),
                secs: self.timeout.as_secs_f64(),
            }
        } else {
            FetchError::Http(err)
        }
    }
}

#[async_trait]
impl FetchStrategy for HttpStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Lightweight
    }

    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let client = self.build_client()?;

        let response = client
            .get(url)
            .header(reqwest::header::ACCEPT, ACCEPT)
            .header(reqwest::header::ACCEPT_LANGUAGE, ACCEPT_LANGUAGE)
            .header(reqwest::header::REFERER, REFERER)
            .send()
            .await
            .map_err(|e| self.classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        response.text().await.map_err(|e| self.classify(url, e))
    }
}

