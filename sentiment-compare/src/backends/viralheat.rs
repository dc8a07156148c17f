//! Viralheat sentiment API client
//!
//! The service accepts at most 360 characters per call and one call every
//! five seconds. Calls are spaced evenly, never sent in bursts.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::http::FormClient;
use super::traits::{BackendResult, SentimentBackend};
use crate::config::{Config, ConfigError};
use crate::corpus::Label;
use crate::runner::RateLimiter;

const NAME: &str = "viralheat";
const DEFAULT_URL: &str = "https://app.viralheat.com/social/api/sentiment";
const MAX_TEXT_CHARS: usize = 360;

/// One call per 5 s unless `rpm` says otherwise
const DEFAULT_RPM: u32 = 12;

/// Below this confidence the mood is not trusted
const MIN_PROBABILITY: f64 = 0.1;

pub struct ViralheatClient {
    client: FormClient,
    api_key: String,
}

impl ViralheatClient {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let bc = config.get_backend(NAME).cloned().unwrap_or_default();
        let interval = call_interval(bc.rpm.unwrap_or(DEFAULT_RPM));
        Ok(Self {
            api_key: bc.api_key(NAME)?,
            client: FormClient::from_config(NAME, DEFAULT_URL, config)?
                .with_limiter(RateLimiter::spaced(interval)),
        })
    }
}

/// Gap between consecutive calls for a per-minute quota
fn call_interval(rpm: u32) -> Duration {
    Duration::from_secs(60) / rpm.max(1)
}

#[derive(Debug, Deserialize)]
struct ViralheatResponse {
    mood: String,
    prob: f64,
}

pub fn extract_label(mood: &str, prob: f64) -> Label {
    if prob < MIN_PROBABILITY {
        return Label::Neutral;
    }
    Label::from_polarity_word(&mood.replace('\'', ""))
}

fn truncate_text(text: &str) -> String {
    if text.chars().count() > MAX_TEXT_CHARS {
        tracing::warn!("Input text is over the {} char limit, truncated", MAX_TEXT_CHARS);
        text.chars().take(MAX_TEXT_CHARS).collect()
    } else {
        text.to_string()
    }
}

#[async_trait]
impl SentimentBackend for ViralheatClient {
    fn name(&self) -> &str {
        NAME
    }

    async fn classify(&self, text: &str) -> BackendResult<Label> {
        let params = [("text", truncate_text(text)), ("api_key", self.api_key.clone())];
        let data: ViralheatResponse = self.client.post_form(&params, &[]).await?;
        Ok(extract_label(&data.mood, data.prob))
    }
}
