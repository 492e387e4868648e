use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use super::{ProviderInfo, Translator};
use crate::config::{Lang, RuntimeConfig};
use crate::error::{Error, Result};

/// Translation model run on the bound AI runtime
pub const BUILTIN_MODEL: &str = "@cf/meta/m2m100-1.2b";

/// The model detects the source language itself
const SOURCE_TAG: &str = "auto";

/// Input for one translation run on the AI runtime
#[derive(Debug, Clone, Serialize)]
pub struct AiTranslationInput<'a> {
    pub text: &'a str,
    pub source_lang: &'a str,
    pub target_lang: &'a str,
}

/// Output of one translation run
#[derive(Debug, Clone, Deserialize)]
pub struct AiTranslationOutput {
    pub translated_text: Option<String>,
}

/// Binding to an AI inference runtime capable of running a translation model.
#[async_trait]
pub trait AiRuntime: Send + Sync {
    async fn run(&self, model: &str, input: AiTranslationInput<'_>) -> Result<AiTranslationOutput>;
}

/// Built-in adapter running the translation model on the bound runtime.
///
/// When no runtime is bound (the deployment has no AI binding) every call
/// errors, which advances the orchestrator's fallback chain.
pub struct BuiltinTranslator {
    runtime: Option<Arc<dyn AiRuntime>>,
}

impl BuiltinTranslator {
    pub const fn new(runtime: Option<Arc<dyn AiRuntime>>) -> Self {
        Self { runtime }
    }

    /// Map a public target code to the label the m2m100 model expects.
    /// Regional variants collapse to the base code.
    fn model_target_label(target: &Lang) -> String {
        match target.as_str() {
            "zh-CN" | "zh-TW" => "zh".to_string(),
            "pt-BR" | "pt-PT" => "pt".to_string(),
            other => other.split('-').next().unwrap_or(other).to_lowercase(),
        }
    }
}

#[async_trait]
impl Translator for BuiltinTranslator {
    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            name: "builtin",
            requires_api_key: false,
        }
    }

    async fn translate(&self, text: &str, target: &Lang) -> Result<String> {
        let Some(runtime) = self.runtime.as_ref() else {
            return Err(Error::RuntimeUnavailable);
        };

        let target_label = Self::model_target_label(target);
        debug!("Running {} for target {}", BUILTIN_MODEL, target_label);

        let output = runtime
            .run(
                BUILTIN_MODEL,
                AiTranslationInput {
                    text,
                    source_lang: SOURCE_TAG,
                    target_lang: &target_label,
                },
            )
            .await?;

        output.translated_text.ok_or_else(|| {
            Error::ProviderInvalidResponse("runtime payload missing translated_text".to_string())
        })
    }
}

/// REST implementation of the runtime binding against the Cloudflare
/// Workers AI endpoint.
pub struct CloudflareAi {
    client: Client,
    config: RuntimeConfig,
}

#[derive(Debug, Deserialize)]
struct CloudflareResponse {
    success: bool,
    result: Option<AiTranslationOutput>,
}

impl CloudflareAi {
    pub const fn new(client: Client, config: RuntimeConfig) -> Self {
        Self { client, config }
    }

    fn run_url(&self, model: &str) -> String {
        format!(
            "https://api.cloudflare.com/client/v4/accounts/{}/ai/run/{}",
            self.config.account_id, model
        )
    }
}

#[async_trait]
impl AiRuntime for CloudflareAi {
    async fn run(&self, model: &str, input: AiTranslationInput<'_>) -> Result<AiTranslationOutput> {
        // Config may override the model the binding serves
        let model = if self.config.model.is_empty() {
            model
        } else {
            self.config.model.as_str()
        };

        let response = self
            .client
            .post(self.run_url(model))
            .header("Authorization", format!("Bearer {}", self.config.api_token))
            .json(&input)
            .send()
            .await
            .map_err(|e| Error::ProviderRequest(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("AI runtime error: {} - {}", status, body);
            return Err(Error::ProviderRequest(format!("HTTP {status}: {body}")));
        }

        let parsed: CloudflareResponse = response
            .json()
            .await
            .map_err(|e| Error::ProviderInvalidResponse(e.to_string()))?;

        if !parsed.success {
            return Err(Error::ProviderInvalidResponse(
                "runtime reported failure".to_string(),
            ));
        }

        parsed
            .result
            .ok_or_else(|| Error::ProviderInvalidResponse("missing result".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_target_label() {
        assert_eq!(BuiltinTranslator::model_target_label(&Lang::new("zh-CN")), "zh");
        assert_eq!(BuiltinTranslator::model_target_label(&Lang::new("pt-BR")), "pt");
        assert_eq!(BuiltinTranslator::model_target_label(&Lang::new("en-US")), "en");
        assert_eq!(BuiltinTranslator::model_target_label(&Lang::new("fr")), "fr");
        assert_eq!(BuiltinTranslator::model_target_label(&Lang::new("JA")), "ja");
    }

    #[tokio::test]
    async fn test_unbound_runtime_errors() {
        let translator = BuiltinTranslator::new(None);
        let err = translator.translate("Hello", &Lang::new("zh")).await.unwrap_err();
        assert!(matches!(err, Error::RuntimeUnavailable));
    }

    #[tokio::test]
    async fn test_missing_translated_text_errors() {
        struct EmptyRuntime;

        #[async_trait]
        impl AiRuntime for EmptyRuntime {
            async fn run(
                &self,
                _model: &str,
                _input: AiTranslationInput<'_>,
            ) -> Result<AiTranslationOutput> {
                Ok(AiTranslationOutput {
                    translated_text: None,
                })
            }
        }

        let translator = BuiltinTranslator::new(Some(Arc::new(EmptyRuntime)));
        let err = translator.translate("Hello", &Lang::new("zh")).await.unwrap_err();
        assert!(matches!(err, Error::ProviderInvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_runtime_receives_fixed_source_tag() {
        struct CapturingRuntime;

        #[async_trait]
        impl AiRuntime for CapturingRuntime {
            async fn run(
                &self,
                model: &str,
                input: AiTranslationInput<'_>,
            ) -> Result<AiTranslationOutput> {
                assert_eq!(model, BUILTIN_MODEL);
                assert_eq!(input.source_lang, "auto");
                assert_eq!(input.target_lang, "zh");
                Ok(AiTranslationOutput {
                    translated_text: Some(format!("[{}]", input.text)),
                })
            }
        }

        let translator = BuiltinTranslator::new(Some(Arc::new(CapturingRuntime)));
        let out = translator.translate("Hello", &Lang::new("zh-CN")).await.unwrap();
        assert_eq!(out, "[Hello]");
    }
}
