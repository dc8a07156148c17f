//! AlchemyAPI text sentiment client

use async_trait::async_trait;
use serde::Deserialize;

use super::http::FormClient;
use super::traits::{BackendError, BackendResult, SentimentBackend};
use crate::config::{Config, ConfigError};
use crate::corpus::Label;

const NAME: &str = "alchemy";
const DEFAULT_URL: &str = "http://access.alchemyapi.com/calls/text/TextGetTextSentiment";

pub struct AlchemyClient {
    client: FormClient,
    api_key: String,
}

impl AlchemyClient {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let bc = config.get_backend(NAME).cloned().unwrap_or_default();
        Ok(Self {
            api_key: bc.api_key(NAME)?,
            client: FormClient::from_config(NAME, DEFAULT_URL, config)?,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AlchemyResponse {
    status: String,
    #[serde(default)]
    status_info: Option<String>,
    doc_sentiment: Option<DocSentiment>,
}

#[derive(Debug, Deserialize)]
struct DocSentiment {
    #[serde(rename = "type")]
    sentiment_type: String,
}

fn extract_label(data: AlchemyResponse) -> BackendResult<Label> {
    if data.status != "OK" {
        return Err(BackendError::Declared(
            data.status_info.unwrap_or(data.status),
        ));
    }
    let sentiment = data
        .doc_sentiment
        .ok_or_else(|| BackendError::Parse("Missing docSentiment".to_string()))?;
    Ok(Label::from_polarity_word(&sentiment.sentiment_type))
}

#[async_trait]
impl SentimentBackend for AlchemyClient {
    fn name(&self) -> &str {
        NAME
    }

    async fn classify(&self, text: &str) -> BackendResult<Label> {
        let params = [
            ("text", text.to_string()),
            ("apikey", self.api_key.clone()),
            ("outputMode", "json".to_string()),
        ];
        let data: AlchemyResponse = self.client.post_form(&params, &[]).await?;
        extract_label(data)
    }
}
