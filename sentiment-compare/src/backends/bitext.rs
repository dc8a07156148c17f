//! Bitext sentiment API client

use async_trait::async_trait;
use serde::Deserialize;

use super::http::FormClient;
use super::traits::{BackendError, BackendResult, SentimentBackend};
use crate::config::{Config, ConfigError};
use crate::corpus::Label;

const NAME: &str = "bitext";
const DEFAULT_URL: &str = "http://svc8.bitext.com/WS_NOps_Val/Service.aspx";

/// Global values range over [-2, 2]
const NEUTRAL_BAND: f64 = 0.4;

fn language_code(language: &str) -> Option<&'static str> {
    match language {
        "en" => Some("Eng"),
        "es" => Some("Esp"),
        "pt" => Some("Por"),
        "it" => Some("Ita"),
        _ => None,
    }
}

pub struct BitextClient {
    client: FormClient,
    user: String,
    password: String,
    language: &'static str,
}

impl BitextClient {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let bc = config.get_backend(NAME).cloned().unwrap_or_default();
        let user = bc.require(NAME, "user", &bc.user)?;
        let password = bc.require(NAME, "password", &bc.password)?;

        let language = config.language_for(NAME);
        let language = language_code(language).ok_or_else(|| ConfigError::UnsupportedLanguage {
            backend: NAME.to_string(),
            language: language.to_string(),
        })?;

        Ok(Self {
            client: FormClient::from_config(NAME, DEFAULT_URL, config)?,
            user,
            password,
            language,
        })
    }
}

#[derive(Debug, Deserialize)]
struct BitextResponse {
    data: Vec<BitextResult>,
}

#[derive(Debug, Deserialize)]
struct BitextResult {
    global_value: f64,
}

pub fn extract_label(score: f64) -> Label {
    Label::from_score(score, NEUTRAL_BAND)
}

#[async_trait]
impl SentimentBackend for BitextClient {
    fn name(&self) -> &str {
        NAME
    }

    async fn classify(&self, text: &str) -> BackendResult<Label> {
        let params = [
            ("User", self.user.clone()),
            ("Pass", self.password.clone()),
            ("Text", text.to_string()),
            ("Lang", self.language.to_string()),
            ("ID", "0".to_string()),
            ("Detail", "Global".to_string()),
            ("OutFormat", "JSON".to_string()),
            ("Normalized", "Both".to_string()),
        ];

        let data: BitextResponse = self.client.post_form(&params, &[]).await?;
        let result = data
            .data
            .first()
            .ok_or_else(|| BackendError::Parse("Empty data array".to_string()))?;
        Ok(extract_label(result.global_value))
    }
}
