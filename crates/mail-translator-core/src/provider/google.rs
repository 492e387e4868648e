use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{ProviderInfo, Translator};
use crate::config::Lang;
use crate::error::{Error, Result};

const API_URL: &str = "https://translation.googleapis.com/language/translate/v2";

/// Google Cloud Translation adapter: JSON POST with a key query parameter.
pub struct GoogleTranslator {
    client: Client,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct GoogleRequest<'a> {
    q: &'a str,
    target: &'a str,
}

#[derive(Debug, Deserialize)]
struct GoogleResponse {
    data: GoogleData,
}

#[derive(Debug, Deserialize)]
struct GoogleData {
    translations: Vec<GoogleTranslation>,
}

#[derive(Debug, Deserialize)]
struct GoogleTranslation {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

impl GoogleTranslator {
    pub const fn new(client: Client, api_key: String) -> Self {
        Self { client, api_key }
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            name: "google",
            requires_api_key: true,
        }
    }

    async fn translate(&self, text: &str, target: &Lang) -> Result<String> {
        let request = GoogleRequest {
            q: text,
            target: target.as_str(),
        };

        let response = self
            .client
            .post(API_URL)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::ProviderRequest(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("Google Translate API error: {} - {}", status, body);
            return Err(Error::ProviderRequest(format!("HTTP {status}: {body}")));
        }

        let parsed: GoogleResponse = response
            .json()
            .await
            .map_err(|e| Error::ProviderInvalidResponse(e.to_string()))?;

        parsed
            .data
            .translations
            .into_iter()
            .next()
            .map(|t| t.translated_text)
            .ok_or_else(|| Error::ProviderInvalidResponse("empty translations array".to_string()))
    }
}
