//! AI Applied sentiment API client

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::http::FormClient;
use super::traits::{BackendError, BackendResult, SentimentBackend};
use crate::config::{Config, ConfigError};
use crate::corpus::Label;

const NAME: &str = "aiapplied";
const DEFAULT_URL: &str = "http://api.ai-applied.nl/api/sentiment_api/";

/// ISO 639-1 to the ISO 639-3 codes the service expects
fn language_code(language: &str) -> Option<&'static str> {
    match language {
        "en" => Some("eng"),
        "nl" => Some("nld"),
        "de" => Some("deu"),
        "fr" => Some("fra"),
        "es" => Some("spa"),
        "it" => Some("ita"),
        "ru" => Some("rus"),
        _ => None,
    }
}

pub struct AiAppliedClient {
    client: FormClient,
    api_key: String,
    language: &'static str,
}

impl AiAppliedClient {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let bc = config.get_backend(NAME).cloned().unwrap_or_default();
        let api_key = bc.api_key(NAME)?;

        let language = config.language_for(NAME);
        let language = language_code(language).ok_or_else(|| ConfigError::UnsupportedLanguage {
            backend: NAME.to_string(),
            language: language.to_string(),
        })?;

        Ok(Self {
            client: FormClient::from_config(NAME, DEFAULT_URL, config)?,
            api_key,
            language,
        })
    }

    fn request_envelope(&self, text: &str) -> String {
        json!({
            "data": {
                "api_key": self.api_key,
                "call": {
                    "return_original": false,
                    "classifier": "subjective",
                    "data": [
                        { "text": text, "language_iso": self.language, "id": 0 }
                    ]
                }
            }
        })
        .to_string()
    }
}

#[derive(Debug, Deserialize)]
struct AiAppliedResponse {
    response: AiAppliedBody,
}

#[derive(Debug, Deserialize)]
struct AiAppliedBody {
    data: Vec<AiAppliedItem>,
}

#[derive(Debug, Deserialize)]
struct AiAppliedItem {
    sentiment_class: String,
}

#[async_trait]
impl SentimentBackend for AiAppliedClient {
    fn name(&self) -> &str {
        NAME
    }

    async fn classify(&self, text: &str) -> BackendResult<Label> {
        let params = [("request", self.request_envelope(text))];
        let data: AiAppliedResponse = self.client.post_form(&params, &[]).await?;
        let item = data
            .response
            .data
            .first()
            .ok_or_else(|| BackendError::Parse("Empty response data".to_string()))?;
        Ok(Label::from_polarity_word(&item.sentiment_class))
    }
}
