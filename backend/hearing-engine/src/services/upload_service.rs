use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{header, Client};
use url::Url;

use crate::error::NetworkError;
use crate::metrics::{UPLOAD_ATTEMPTS_TOTAL, UPLOAD_DURATION_SECONDS};
use crate::models::TestResult;
use crate::utils::retry::{retry_async_with_config, RetryConfig};

/// Submits finished test results to the remote collector.
#[async_trait]
pub trait ResultUploader: Send + Sync {
    async fn upload(&self, result: &TestResult) -> Result<(), NetworkError>;
}

pub struct HttpResultUploader {
    http_client: Client,
    endpoint: Url,
    timeout: Duration,
    retry: RetryConfig,
}

impl HttpResultUploader {
    pub fn new(endpoint: Url, timeout: Duration, retry: RetryConfig) -> Self {
        Self {
            http_client: Client::new(),
            endpoint,
            timeout,
            retry,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn post_once(&self, body: &[u8], attempt: usize) -> Result<(), NetworkError> {
        tracing::debug!(
            "Uploading test result to {} (attempt {}/{})",
            self.endpoint,
            attempt,
            self.retry.max_attempts
        );

        let started = Instant::now();
        let response = self
            .http_client
            .post(self.endpoint.clone())
            .header(header::CONTENT_TYPE, "application/json")
            .timeout(self.timeout)
            .body(body.to_vec())
            .send()
            .await;
        UPLOAD_DURATION_SECONDS.observe(started.elapsed().as_secs_f64());

        let outcome = match response {
            Ok(response) if response.status().is_success() => Ok(()),
            Ok(response) => Err(NetworkError::ServerError(response.status().as_u16())),
            Err(e) => Err(classify_transport_error(&e)),
        };

        match &outcome {
            Ok(()) => {
                UPLOAD_ATTEMPTS_TOTAL.with_label_values(&["success"]).inc();
            }
            Err(e) => {
                UPLOAD_ATTEMPTS_TOTAL.with_label_values(&[e.as_label()]).inc();
                tracing::warn!("Upload attempt {} failed: {}", attempt, e);
            }
        }

        outcome
    }
}

#[async_trait]
impl ResultUploader for HttpResultUploader {
    async fn upload(&self, result: &TestResult) -> Result<(), NetworkError> {
        let body = serde_json::to_vec(result).map_err(|e| {
            tracing::error!("Failed to encode test result: {}", e);
            UPLOAD_ATTEMPTS_TOTAL
                .with_label_values(&[NetworkError::Encoding.as_label()])
                .inc();
            NetworkError::Encoding
        })?;

        retry_async_with_config(self.retry.clone(), NetworkError::is_retryable, |attempt| {
            let body = &body;
            async move { self.post_once(body, attempt).await }
        })
        .await?;

        tracing::info!(
            "Uploaded test result: score={}, rounds={}",
            result.score,
            result.rounds.len()
        );
        Ok(())
    }
}

fn classify_transport_error(err: &reqwest::Error) -> NetworkError {
    if err.is_timeout() {
        NetworkError::Timeout
    } else if err.is_connect() {
        NetworkError::NoConnectivity
    } else if err.is_decode() || err.is_body() || is_malformed_response(err) {
        NetworkError::InvalidResponse
    } else {
        NetworkError::Unknown(err.to_string())
    }
}

/// The peer answered, but not with something hyper could parse as HTTP.
fn is_malformed_response(err: &reqwest::Error) -> bool {
    let mut source = std::error::Error::source(err);
    while let Some(e) = source {
        if let Some(hyper_err) = e.downcast_ref::<hyper::Error>() {
            return hyper_err.is_parse() || hyper_err.is_parse_status();
        }
        source = e.source();
    }
    false
}
