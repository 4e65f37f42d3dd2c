// JSON-over-HTTP transport shared by the aggregator, wallet, billing and
// booking-history clients. One attempt per call: failures are reported to the
// caller and never retried here.

use crate::aggregator::ApiEnvelope;
use crate::config::PortalConfig;
use crate::error::{PortalError, PortalResult};
use parking_lot::Mutex;
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Instant;

#[derive(Debug, Default, Clone)]
pub struct ClientStats {
    pub requests_sent: usize,
    pub requests_succeeded: usize,
    pub requests_failed: usize,
    pub average_response_time_ms: f64,
    pub max_response_time_ms: f64,
}

// Error body the backend sends alongside non-2xx statuses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

pub struct HttpTransport {
    client: Client,
    base_url: String,
    token: Option<SecretString>,
    stats: Mutex<ClientStats>,
}

impl HttpTransport {
    pub fn new(config: &PortalConfig) -> PortalResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| PortalError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: config.auth_token.clone(),
            stats: Mutex::new(ClientStats::default()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn stats(&self) -> ClientStats {
        self.stats.lock().clone()
    }

    // POST to an endpoint answering with `{status, data, message}`
    pub async fn post_envelope<B, T>(&self, path: &str, body: &B) -> PortalResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let raw = self.execute(path, self.client.post(self.url(path)).json(body)).await?;
        decode_envelope(&raw)
    }

    pub async fn get_envelope<T>(&self, path: &str) -> PortalResult<T>
    where
        T: DeserializeOwned,
    {
        let raw = self.execute(path, self.client.get(self.url(path))).await?;
        decode_envelope(&raw)
    }

    // POST to an endpoint answering with a bare JSON document
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> PortalResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let raw = self.execute(path, self.client.post(self.url(path)).json(body)).await?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub async fn get_json<T>(&self, path: &str) -> PortalResult<T>
    where
        T: DeserializeOwned,
    {
        let raw = self.execute(path, self.client.get(self.url(path))).await?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn execute(&self, path: &str, request: RequestBuilder) -> PortalResult<String> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        };

        let started = Instant::now();
        let outcome = self.send(request).await;
        self.record(started, outcome.is_ok());

        match &outcome {
            Ok(_) => tracing::debug!(path, elapsed_ms = started.elapsed().as_millis() as u64, "request completed"),
            Err(err) => tracing::warn!(path, error = %err, "request failed"),
        }
        outcome
    }

    async fn send(&self, request: RequestBuilder) -> PortalResult<String> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return Ok(body);
        }

        let (message, code) = serde_json::from_str::<ErrorBody>(&body)
            .map(|e| (e.message.unwrap_or_default(), e.code))
            .unwrap_or_default();

        Err(PortalError::Api {
            status: status.as_u16(),
            message,
            code,
        })
    }

    fn record(&self, started: Instant, succeeded: bool) {
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        let mut stats = self.stats.lock();

        stats.requests_sent += 1;
        if succeeded {
            stats.requests_succeeded += 1;
        } else {
            stats.requests_failed += 1;
        }

        let n = stats.requests_sent as f64;
        stats.average_response_time_ms += (elapsed_ms - stats.average_response_time_ms) / n;
        stats.max_response_time_ms = stats.max_response_time_ms.max(elapsed_ms);
    }
}

fn decode_envelope<T: DeserializeOwned>(raw: &str) -> PortalResult<T> {
    let envelope: ApiEnvelope<T> = serde_json::from_str(raw)?;
    envelope.into_data()
}
