use super::errors::IndexError;
use super::protocol::IndexResponse;

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};

/// A value together with the wall time it took to obtain it.
#[derive(Debug)]
pub struct Timed<T> {
    pub value: T,
    pub elapsed: Duration,
}

/// HTTP handle to one Elasticsearch-compatible service.
///
/// Creating the handle does not contact the service, so a service that is down
/// at startup does not prevent the front end from starting; calls made while it
/// is unreachable fail with `IndexError::Request`.
#[derive(Debug, Clone)]
pub struct IndexClient {
    name: &'static str,
    base_url: String,
    http: reqwest::Client,
    timeout: Duration,
}

impl IndexClient {
    /// Validates the base URL and prepares the HTTP client.
    pub fn connect(name: &'static str, base_url: &str, timeout: Duration) -> Result<Self> {
        let parsed = url::Url::parse(base_url)
            .with_context(|| format!("Invalid {} URL: {}", name, base_url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            anyhow::bail!("Unsupported scheme for {} URL: {}", name, base_url);
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .with_context(|| format!("Failed to build HTTP client for {}", name))?;

        Ok(Self {
            name,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of an endpoint on this service.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Checks once whether the service answers. The outcome is only logged.
    pub async fn probe(&self) -> bool {
        match self.http.get(&self.base_url).timeout(self.timeout).send().await {
            Ok(resp) if resp.status().is_success() => {
                tracing::info!("Connected to {} at {}", self.name, self.base_url);
                true
            }
            Ok(resp) => {
                tracing::warn!(
                    "{} at {} answered health probe with {}",
                    self.name,
                    self.base_url,
                    resp.status()
                );
                false
            }
            Err(e) => {
                // Might be a temporary failure, requests will report it if it persists.
                tracing::warn!("Connection to {} at {} failed: {}", self.name, self.base_url, e);
                false
            }
        }
    }

    /// POSTs `body` to `path` and decodes the answer.
    ///
    /// The elapsed time covers the network round trip and decoding, and is
    /// reported on failures as well.
    pub async fn request<H, B>(&self, path: &str, body: &B) -> Result<Timed<IndexResponse<H>>, IndexError>
    where
        H: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path);
        let start = Instant::now();

        let response = self
            .http
            .post(&url)
            .json(body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|source| IndexError::Request {
                url: url.clone(),
                elapsed: start.elapsed(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(IndexError::Status {
                url,
                status,
                elapsed: start.elapsed(),
            });
        }

        let bytes = response.bytes().await.map_err(|source| IndexError::Request {
            url: url.clone(),
            elapsed: start.elapsed(),
            source,
        })?;

        let parsed = serde_json::from_slice(&bytes).map_err(|source| IndexError::Decode {
            url: url.clone(),
            elapsed: start.elapsed(),
            source,
        })?;

        let elapsed = start.elapsed();
        tracing::debug!("{} answered {} in {:?}", self.name, path, elapsed);

        Ok(Timed {
            value: parsed,
            elapsed,
        })
    }
}

/// Sends a request through a handle that may never have been established.
pub async fn request<H, B>(
    client: Option<&IndexClient>,
    path: &str,
    body: &B,
) -> Result<Timed<IndexResponse<H>>, IndexError>
where
    H: DeserializeOwned,
    B: Serialize + ?Sized,
{
    let client = client.ok_or(IndexError::NoClient)?;
    client.request(path, body).await
}
