use async_trait::async_trait;
use reqwest::Client;
use tracing::warn;

use super::{ProviderInfo, Translator};
use crate::config::Lang;
use crate::error::Result;

const API_URL: &str = "https://api.mymemory.translated.net/get";

const USER_AGENT: &str = "MailTranslator/1.0";

/// Free terminal-fallback adapter against the public MyMemory API.
///
/// This is the last link of the fallback chain: every failure path returns
/// the original text instead of an error, so the chain as a whole never
/// propagates a provider failure to the caller.
pub struct MyMemoryTranslator {
    client: Client,
}

impl MyMemoryTranslator {
    pub const fn new(client: Client) -> Self {
        Self { client }
    }

    async fn try_translate(&self, text: &str, target: &Lang) -> Option<String> {
        let lang_pair = format!("auto|{}", target.as_str());
        let url = format!(
            "{}?q={}&langpair={}",
            API_URL,
            urlencoding::encode(text),
            urlencoding::encode(&lang_pair)
        );

        let response = self
            .client
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .inspect_err(|e| warn!("MyMemory request failed: {e}"))
            .ok()?;

        if !response.status().is_success() {
            warn!("MyMemory returned HTTP {}", response.status());
            return None;
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .inspect_err(|e| warn!("MyMemory payload undecodable: {e}"))
            .ok()?;

        // The API reports its own status inside the payload
        if payload.get("responseStatus").and_then(serde_json::Value::as_i64) != Some(200) {
            warn!("MyMemory reported failure: {:?}", payload.get("responseStatus"));
            return None;
        }

        payload
            .get("responseData")
            .and_then(|d| d.get("translatedText"))
            .and_then(serde_json::Value::as_str)
            .map(ToString::to_string)
    }
}

#[async_trait]
impl Translator for MyMemoryTranslator {
    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            name: "mymemory",
            requires_api_key: false,
        }
    }

    async fn translate(&self, text: &str, target: &Lang) -> Result<String> {
        match self.try_translate(text, target).await {
            Some(translated) => Ok(translated),
            None => {
                // Terminal fallback: degrade to the original text
                warn!("All MyMemory paths failed, returning text unchanged");
                Ok(text.to_string())
            }
        }
    }
}
