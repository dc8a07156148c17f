//! Skyttle sentiment API client (via Mashape)

use async_trait::async_trait;
use serde::Deserialize;

use super::http::FormClient;
use super::traits::{BackendError, BackendResult, SentimentBackend};
use crate::config::{Config, ConfigError};
use crate::corpus::Label;

const NAME: &str = "skyttle";
const DEFAULT_URL: &str = "https://sentinelprojects-skyttle20.p.mashape.com/";

pub struct SkyttleClient {
    client: FormClient,
    mashape_auth: String,
    language: String,
    domain: Option<String>,
}

impl SkyttleClient {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let bc = config.get_backend(NAME).cloned().unwrap_or_default();
        let mashape_auth = bc.api_key(NAME)?;

        Ok(Self {
            client: FormClient::from_config(NAME, DEFAULT_URL, config)?,
            mashape_auth,
            language: config.language_for(NAME).to_string(),
            domain: bc.domain.filter(|d| !d.trim().is_empty()),
        })
    }
}

#[derive(Debug, Deserialize)]
struct SkyttleResponse {
    docs: Vec<SkyttleDoc>,
}

#[derive(Debug, Deserialize)]
struct SkyttleDoc {
    sentiment_scores: SentimentScores,
}

#[derive(Debug, Deserialize)]
pub struct SentimentScores {
    pub pos: f64,
    pub neg: f64,
}

/// Ties between positive and negative mass are neutral
pub fn extract_label(scores: &SentimentScores) -> Label {
    if scores.pos == scores.neg {
        Label::Neutral
    } else if scores.pos > scores.neg {
        Label::Positive
    } else {
        Label::Negative
    }
}

impl SkyttleClient {
    fn params(&self, text: &str) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("text", text.to_string()),
            ("lang", self.language.clone()),
            ("keywords", "0".to_string()),
            ("sentiment", "1".to_string()),
        ];
        if let Some(domain) = &self.domain {
            params.push(("domain", domain.clone()));
        }
        params
    }
}

#[async_trait]
impl SentimentBackend for SkyttleClient {
    fn name(&self) -> &str {
        NAME
    }

    async fn classify(&self, text: &str) -> BackendResult<Label> {
        let params = self.params(text);
        let headers = [("X-Mashape-Authorization", self.mashape_auth.clone())];

        let data: SkyttleResponse = self.client.post_form(&params, &headers).await?;
        let doc = data
            .docs
            .first()
            .ok_or_else(|| BackendError::Parse("No documents in response".to_string()))?;
        Ok(extract_label(&doc.sentiment_scores))
    }
}
