// src/fetch/http.rs

use reqwest::{header::CONTENT_TYPE, Client};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::PageSource;
use crate::error::{DepthChartError, Result};
use crate::teams::Team;

/// Live ESPN pages over HTTP. One GET per team, no retries.
#[derive(Clone)]
pub struct HttpSource {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| DepthChartError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
            timeout,
        })
    }

    fn describe(&self, err: reqwest::Error) -> String {
        if err.is_timeout() {
            format!("timed out after {:?}", self.timeout)
        } else if let Some(status) = err.status() {
            format!("HTTP status {}", status)
        } else {
            err.to_string()
        }
    }
}

impl PageSource for HttpSource {
    async fn fetch(&self, team: &Team) -> Result<String> {
        let url = team.depth_chart_url(&self.base_url)?;
        info!(team = %team.name, %url, "fetching depth chart");

        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| DepthChartError::network(&team.name, self.describe(e)))?;

        if let Some(ct) = resp.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) {
            if !ct.contains("html") {
                warn!(team = %team.name, content_type = ct, "unexpected content type");
            }
        }

        let body = resp
            .text()
            .await
            .map_err(|e| DepthChartError::network(&team.name, format!("reading body: {}", self.describe(e))))?;
        debug!(team = %team.name, bytes = body.len(), "fetched");
        Ok(body)
    }
}
