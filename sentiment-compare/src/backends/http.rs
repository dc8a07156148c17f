//! Shared client for services that accept a form POST and answer with JSON

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

use super::traits::{BackendError, BackendResult};
use crate::config::{Config, ConfigError};
use crate::runner::RateLimiter;

/// Longest response body echoed back in error messages
const MAX_ERROR_BODY: usize = 200;

/// Form-encoded POST client used by every HTTP backend
pub struct FormClient {
    backend: String,
    url: String,
    http_client: Client,
    rate_limiter: Option<RateLimiter>,
}

impl FormClient {
    /// Build a client for `url` whose requests give up after `timeout`
    pub fn new(
        backend: impl Into<String>,
        url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let backend = backend.into();
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient {
                backend: backend.clone(),
                message: e.to_string(),
            })?;

        Ok(Self {
            backend,
            url: url.into(),
            http_client,
            rate_limiter: None,
        })
    }

    /// Build a client from a backend's configuration: `base_url` overrides
    /// `default_url`, and the backend's timeout and request limit apply
    pub fn from_config(backend: &str, default_url: &str, config: &Config) -> Result<Self, ConfigError> {
        let url = config
            .get_backend(backend)
            .and_then(|b| b.base_url.clone())
            .unwrap_or_else(|| default_url.to_string());
        Self::with_url(backend, url, config)
    }

    /// Build a client for an already resolved URL using the backend's
    /// timeout and request limit
    pub fn with_url(backend: &str, url: String, config: &Config) -> Result<Self, ConfigError> {
        let client = Self::new(backend, url, config.timeout_for(backend))?;
        Ok(match config.get_backend(backend).and_then(|b| b.rpm) {
            Some(rpm) => client.with_rate_limit(rpm),
            None => client,
        })
    }

    /// Limit this client to `rpm` requests per minute
    pub fn with_rate_limit(self, rpm: u32) -> Self {
        self.with_limiter(RateLimiter::new(rpm))
    }

    /// Replace any configured limit with `limiter`
    pub fn with_limiter(mut self, limiter: RateLimiter) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    pub fn rate_limiter(&self) -> Option<&RateLimiter> {
        self.rate_limiter.as_ref()
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// POST `params` and decode the JSON answer
    pub async fn post_form<T: DeserializeOwned>(
        &self,
        params: &[(&str, String)],
        headers: &[(&str, String)],
    ) -> BackendResult<T> {
        if let Some(limiter) = &self.rate_limiter {
            limiter.acquire().await;
        }

        let mut request = self.http_client.post(&self.url).form(params);
        for (name, value) in headers {
            request = request.header(*name, value);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(backend = %self.backend, status = status.as_u16(), "Got response: {}", body);

        if status == 429 {
            return Err(BackendError::RateLimited);
        }

        if status == 401 || status == 403 {
            return Err(BackendError::Auth {
                status: status.as_u16(),
                message: truncate(&body),
            });
        }

        if !status.is_success() {
            return Err(BackendError::Api {
                status: status.as_u16(),
                message: truncate(&body),
            });
        }

        decode_json(&body)
    }
}

/// Decode a JSON body, reporting malformed payloads as parse errors
pub fn decode_json<T: DeserializeOwned>(body: &str) -> BackendResult<T> {
    serde_json::from_str(body)
        .map_err(|e| BackendError::Parse(format!("{} in body: {}", e, truncate(body))))
}

fn truncate(body: &str) -> String {
    if body.chars().count() <= MAX_ERROR_BODY {
        body.to_string()
    } else {
        let head: String = body.chars().take(MAX_ERROR_BODY).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Score {
        score: f64,
    }

    #[test]
    fn test_decode_json() {
        let parsed: Score = decode_json(r#"{"score": 0.5}"#).unwrap();
        assert_eq!(parsed.score, 0.5);
    }

    #[test]
    fn test_decode_json_malformed() {
        let err = decode_json::<Score>(r#"{"status": "fail"}"#).unwrap_err();
        assert!(matches!(err, BackendError::Parse(_)));
        assert!(err.to_string().contains("status"));
    }

    #[test]
    fn test_truncate_long_body() {
        let body = "x".repeat(500);
        let out = truncate(&body);
        assert_eq!(out.len(), MAX_ERROR_BODY + 3);
        assert!(out.ends_with("..."));
    }
}
