//! Lymbix tonalize API client

use async_trait::async_trait;
use serde::Deserialize;

use super::http::FormClient;
use super::traits::{BackendResult, SentimentBackend};
use crate::config::{Config, ConfigError};
use crate::corpus::Label;

const NAME: &str = "lymbix";
const DEFAULT_URL: &str = "http://api.lymbix.com/tonalize";
const API_VERSION: &str = "2.2";

pub struct LymbixClient {
    client: FormClient,
    api_key: String,
}

impl LymbixClient {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let bc = config.get_backend(NAME).cloned().unwrap_or_default();
        Ok(Self {
            api_key: bc.api_key(NAME)?,
            client: FormClient::from_config(NAME, DEFAULT_URL, config)?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct LymbixResponse {
    article_sentiment: ArticleSentiment,
}

#[derive(Debug, Deserialize)]
struct ArticleSentiment {
    sentiment: String,
}

#[async_trait]
impl SentimentBackend for LymbixClient {
    fn name(&self) -> &str {
        NAME
    }

    async fn classify(&self, text: &str) -> BackendResult<Label> {
        let params = [
            ("article", text.to_string()),
            ("return_fields", "article_sentiment".to_string()),
        ];
        let headers = [
            ("Authentication", self.api_key.clone()),
            ("Accept", "application/json".to_string()),
            ("Version", API_VERSION.to_string()),
        ];

        let data: LymbixResponse = self.client.post_form(&params, &headers).await?;
        Ok(Label::from_polarity_word(&data.article_sentiment.sentiment))
    }
}
