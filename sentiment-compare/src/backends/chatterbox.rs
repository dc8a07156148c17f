//! Chatterbox sentiment API client (via Mashape)

use async_trait::async_trait;
use serde::Deserialize;

use super::http::FormClient;
use super::traits::{BackendResult, SentimentBackend};
use crate::config::{Config, ConfigError};
use crate::corpus::Label;

const NAME: &str = "chatterbox";
const DEFAULT_URL: &str =
    "https://chatterbox-analytics-sentiment-analysis-free.p.mashape.com/sentiment/current/classify_text/";

/// Scores range over [-1, 1]; this band around zero is neutral
const NEUTRAL_BAND: f64 = 0.2;

pub struct ChatterboxClient {
    client: FormClient,
    mashape_auth: String,
    language: String,
}

impl ChatterboxClient {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let bc = config.get_backend(NAME).cloned().unwrap_or_default();
        let mashape_auth = bc.api_key(NAME)?;

        Ok(Self {
            client: FormClient::from_config(NAME, DEFAULT_URL, config)?,
            mashape_auth,
            language: config.language_for(NAME).to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ChatterboxResponse {
    value: f64,
}

pub fn extract_label(score: f64) -> Label {
    Label::from_score(score, NEUTRAL_BAND)
}

#[async_trait]
impl SentimentBackend for ChatterboxClient {
    fn name(&self) -> &str {
        NAME
    }

    async fn classify(&self, text: &str) -> BackendResult<Label> {
        let params = [("text", text.to_string()), ("lang", self.language.clone())];
        let headers = [("X-Mashape-Authorization", self.mashape_auth.clone())];

        let data: ChatterboxResponse = self.client.post_form(&params, &headers).await?;
        Ok(extract_label(data.value))
    }
}
