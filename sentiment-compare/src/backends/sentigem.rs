//! Sentigem sentiment API client

use async_trait::async_trait;
use serde::Deserialize;

use super::http::FormClient;
use super::traits::{BackendResult, SentimentBackend};
use crate::config::{Config, ConfigError};
use crate::corpus::Label;

const NAME: &str = "sentigem";
const DEFAULT_URL: &str = "https://api.sentigem.com/external/get-sentiment";

pub struct SentigemClient {
    client: FormClient,
    api_key: String,
}

impl SentigemClient {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let bc = config.get_backend(NAME).cloned().unwrap_or_default();
        Ok(Self {
            api_key: bc.api_key(NAME)?,
            client: FormClient::from_config(NAME, DEFAULT_URL, config)?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct SentigemResponse {
    polarity: String,
}

#[async_trait]
impl SentimentBackend for SentigemClient {
    fn name(&self) -> &str {
        NAME
    }

    async fn classify(&self, text: &str) -> BackendResult<Label> {
        let params = [("text", text.to_string()), ("api-key", self.api_key.clone())];
        let data: SentigemResponse = self.client.post_form(&params, &[]).await?;
        Ok(Label::from_polarity_word(&data.polarity))
    }
}
