//! Datumbox sentiment API client

use async_trait::async_trait;
use serde::Deserialize;

use super::http::FormClient;
use super::traits::{BackendResult, SentimentBackend};
use crate::config::{Config, ConfigError};
use crate::corpus::Label;

const NAME: &str = "datumbox";
const DEFAULT_URL: &str = "http://api.datumbox.com/1.0/SentimentAnalysis.json";

pub struct DatumboxClient {
    client: FormClient,
    api_key: String,
}

impl DatumboxClient {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let bc = config.get_backend(NAME).cloned().unwrap_or_default();
        Ok(Self {
            api_key: bc.api_key(NAME)?,
            client: FormClient::from_config(NAME, DEFAULT_URL, config)?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct DatumboxResponse {
    output: DatumboxOutput,
}

#[derive(Debug, Deserialize)]
struct DatumboxOutput {
    result: String,
}

#[async_trait]
impl SentimentBackend for DatumboxClient {
    fn name(&self) -> &str {
        NAME
    }

    async fn classify(&self, text: &str) -> BackendResult<Label> {
        let params = [("text", text.to_string()), ("api_key", self.api_key.clone())];
        let data: DatumboxResponse = self.client.post_form(&params, &[]).await?;
        Ok(Label::from_polarity_word(&data.output.result))
    }
}
