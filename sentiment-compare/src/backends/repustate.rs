//! Repustate sentiment API client

use async_trait::async_trait;
use serde::Deserialize;

use super::http::FormClient;
use super::traits::{BackendResult, SentimentBackend};
use crate::config::{Config, ConfigError};
use crate::corpus::Label;

const NAME: &str = "repustate";
const DEFAULT_BASE_URL: &str = "http://api.repustate.com/v2";
const SUPPORTED_LANGUAGES: &[&str] = &["en", "ar", "zh", "de", "fr", "es", "it"];
const NEUTRAL_BAND: f64 = 0.2;
/// Used unless the backend's own `language` is set
const DEFAULT_LANGUAGE: &str = "en";

pub struct RepustateClient {
    client: FormClient,
    language: String,
}

impl RepustateClient {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let bc = config.get_backend(NAME).cloned().unwrap_or_default();
        let api_key = bc.api_key(NAME)?;

        let language = bc.language.clone().unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
        if !SUPPORTED_LANGUAGES.contains(&language.as_str()) {
            return Err(ConfigError::UnsupportedLanguage {
                backend: NAME.to_string(),
                language,
            });
        }

        // the key is part of the endpoint path
        let base = bc.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let url = format!("{}/{}/score.json", base.trim_end_matches('/'), api_key);

        Ok(Self {
            client: FormClient::with_url(NAME, url, config)?,
            language,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RepustateResponse {
    score: f64,
}

pub fn extract_label(score: f64) -> Label {
    Label::from_score(score, NEUTRAL_BAND)
}

#[async_trait]
impl SentimentBackend for RepustateClient {
    fn name(&self) -> &str {
        NAME
    }

    async fn classify(&self, text: &str) -> BackendResult<Label> {
        let params = [("text", text.to_string()), ("lang", self.language.clone())];
        let data: RepustateResponse = self.client.post_form(&params, &[]).await?;
        Ok(extract_label(data.score))
    }
}
