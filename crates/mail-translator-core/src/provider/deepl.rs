use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

use super::{ProviderInfo, Translator};
use crate::config::Lang;
use crate::error::{Error, Result};

const API_URL: &str = "https://api-free.deepl.com/v2/translate";

/// DeepL adapter: form-encoded POST with a DeepL-Auth-Key header.
pub struct DeeplTranslator {
    client: Client,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct DeeplResponse {
    translations: Vec<DeeplTranslation>,
}

#[derive(Debug, Deserialize)]
struct DeeplTranslation {
    text: String,
}

impl DeeplTranslator {
    pub const fn new(client: Client, api_key: String) -> Self {
        Self { client, api_key }
    }

    /// Map a public target code to DeepL's code set.
    /// Codes outside the table fall back to the uppercased base code.
    fn deepl_target_code(target: &Lang) -> String {
        match target.as_str() {
            "en" => "EN-US".to_string(),
            "zh" | "zh-CN" => "ZH".to_string(),
            "zh-TW" => "ZH-HANT".to_string(),
            "pt" | "pt-PT" => "PT-PT".to_string(),
            "pt-BR" => "PT-BR".to_string(),
            other => other
                .split('-')
                .next()
                .unwrap_or(other)
                .to_uppercase(),
        }
    }
}

#[async_trait]
impl Translator for DeeplTranslator {
    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            name: "deepl",
            requires_api_key: true,
        }
    }

    async fn translate(&self, text: &str, target: &Lang) -> Result<String> {
        let form = [
            ("text", text),
            ("target_lang", &Self::deepl_target_code(target)),
        ];

        let response = self
            .client
            .post(API_URL)
            .header("Authorization", format!("DeepL-Auth-Key {}", self.api_key))
            .form(&form)
            .send()
            .await
            .map_err(|e| Error::ProviderRequest(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("DeepL API error: {} - {}", status, body);
            return Err(Error::ProviderRequest(format!("HTTP {status}: {body}")));
        }

        let parsed: DeeplResponse = response
            .json()
            .await
            .map_err(|e| Error::ProviderInvalidResponse(e.to_string()))?;

        parsed
            .translations
            .into_iter()
            .next()
            .map(|t| t.text)
            .ok_or_else(|| Error::ProviderInvalidResponse("empty translations array".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_code_table() {
        assert_eq!(DeeplTranslator::deepl_target_code(&Lang::new("en")), "EN-US");
        assert_eq!(DeeplTranslator::deepl_target_code(&Lang::new("zh-CN")), "ZH");
        assert_eq!(DeeplTranslator::deepl_target_code(&Lang::new("pt-BR")), "PT-BR");
        // Unmapped codes default to the uppercased base code
        assert_eq!(DeeplTranslator::deepl_target_code(&Lang::new("fr")), "FR");
        assert_eq!(DeeplTranslator::deepl_target_code(&Lang::new("sr-Latn")), "SR");
    }
}
