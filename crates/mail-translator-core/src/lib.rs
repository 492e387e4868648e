//! Mail Translator Core Library
//!
//! This library provides the translation pipeline for a webmail backend:
//! - Multi-provider text translation (built-in AI runtime, DeepL, Google,
//!   free fallback) with a degrading fallback chain
//! - Chunking for long inputs
//! - HTML-aware text-node extraction and reassembly
//! - Heuristic source-language detection
//! - Caching (memory and disk) of successful translations

pub mod cache;
pub mod chunk;
pub mod config;
pub mod detect;
pub mod error;
pub mod html;
pub mod provider;
pub mod settings;
pub mod util;

pub use cache::{CacheKey, TranslationCache};
pub use chunk::{split_chunks, MAX_CHUNK_CHARS};
pub use config::{AppConfig, CacheConfig, Lang, ProviderKind, RuntimeConfig, TranslationConfig};
pub use detect::detect_language;
pub use error::{Error, Result};
pub use provider::{
    AiRuntime, BuiltinTranslator, CloudflareAi, DeeplTranslator, GoogleTranslator,
    HttpProviderFactory, MyMemoryTranslator, ProviderFactory, ProviderInfo, Translator,
    BUILTIN_MODEL,
};
pub use settings::{Settings, StaticSettings};
pub use util::clear_translation_cache;

use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, warn};

use config::default_cache_ttl_seconds;

/// High-level translation service combining detection, caching, chunking,
/// and provider dispatch.
///
/// Apart from input validation at the public boundary, calls never fail
/// outward: the worst case is the original text, returned unchanged.
pub struct TranslationService {
    settings: Arc<dyn Settings>,
    providers: Arc<dyn ProviderFactory>,
    cache: TranslationCache,
}

impl TranslationService {
    /// Create a service with the real HTTP providers and configured cache
    pub fn new(config: &AppConfig) -> Result<Self> {
        let settings = Arc::new(StaticSettings::new(config.translation.clone()));
        let providers = Arc::new(HttpProviderFactory::new(config.runtime.as_ref()));
        let cache = TranslationCache::new(&config.cache)?;

        Ok(Self::with_parts(settings, providers, cache))
    }

    /// Assemble a service from injected collaborators (used by tests and by
    /// hosts that bring their own settings store or runtime binding)
    pub fn with_parts(
        settings: Arc<dyn Settings>,
        providers: Arc<dyn ProviderFactory>,
        cache: TranslationCache,
    ) -> Self {
        Self {
            settings,
            providers,
            cache,
        }
    }

    /// Translate plain text into `target`.
    ///
    /// Errors only on unusable input (empty text or target code); provider
    /// and cache failures degrade to the original text.
    pub async fn translate_text(&self, text: &str, target: &Lang) -> Result<String> {
        validate(text, target)?;

        // Settings may change between calls; read a fresh snapshot
        let config = self.settings.translation_config();
        if !config.enabled {
            debug!("Translation disabled, passing text through");
            return Ok(text.to_string());
        }

        let chunks = split_chunks(text, MAX_CHUNK_CHARS);
        if chunks.len() == 1 {
            return Ok(self.translate_chunk(text, target, &config).await);
        }

        debug!("Translating {} chunks", chunks.len());
        let translated = join_all(
            chunks
                .iter()
                .map(|chunk| self.translate_chunk(chunk, target, &config)),
        )
        .await;

        // Reassembly order is the original chunk order
        Ok(translated.concat())
    }

    /// Translate the text nodes of an HTML-like document into `target`,
    /// preserving tag structure.
    ///
    /// Translation is best-effort per node: a failing node keeps its
    /// original text rather than aborting the document.
    pub async fn translate_html(&self, html: &str, target: &Lang) -> Result<String> {
        validate(html, target)?;

        let Some(nodes) = html::extract_text_nodes(html) else {
            debug!("No translatable text nodes found");
            return Ok(html.to_string());
        };

        let translated = join_all(nodes.segments.iter().map(|segment| async move {
            match self.translate_text(segment, target).await {
                Ok(text) => text,
                Err(e) => {
                    warn!("Text node translation failed, keeping original: {e}");
                    segment.clone()
                }
            }
        }))
        .await;

        Ok(html::reassemble(&nodes.template, &translated))
    }

    /// Translate text, routing through the text-node translator when the
    /// input looks like markup.
    pub async fn translate(&self, text: &str, target: &Lang) -> Result<String> {
        if html::looks_like_markup(text) {
            self.translate_html(text, target).await
        } else {
            self.translate_text(text, target).await
        }
    }

    /// Translate one bounded chunk: detect, consult the cache, dispatch to
    /// a provider, and record the result.
    async fn translate_chunk(
        &self,
        chunk: &str,
        target: &Lang,
        config: &TranslationConfig,
    ) -> String {
        let detected = detect_language(chunk);
        if detected.as_str() == target.primary() {
            debug!("Source language {} matches target, skipping", detected);
            return chunk.to_string();
        }

        let key = CacheKey::new(chunk, target);
        if let Some(cached) = self.cache.get(&key).await {
            debug!("Cache hit for {key}");
            return cached;
        }

        let result = self.dispatch(config, chunk, target).await;

        // Never cache a pass-through: a degraded result should be retried
        if result != chunk {
            self.cache
                .insert(&key, &result, default_cache_ttl_seconds())
                .await;
        }

        result
    }

    /// Run the provider fallback chain: configured provider, then the
    /// built-in runtime, then the free terminal fallback. Never fails.
    async fn dispatch(&self, config: &TranslationConfig, text: &str, target: &Lang) -> String {
        let api_key = config.api_key.as_deref().filter(|key| !key.is_empty());

        let mut kind = config.provider;
        if kind.requires_api_key() && api_key.is_none() {
            warn!("{kind} selected without an API key, downgrading to builtin");
            kind = ProviderKind::Builtin;
        }

        let primary = self.providers.create(kind, api_key);
        let first_error = match primary.translate(text, target).await {
            Ok(translated) => return translated,
            Err(e) => e,
        };
        warn!("{} translation failed: {first_error}", primary.name());

        if kind != ProviderKind::Builtin {
            let builtin = self.providers.create(ProviderKind::Builtin, None);
            match builtin.translate(text, target).await {
                Ok(translated) => return translated,
                Err(e) => warn!("builtin translation failed: {e}"),
            }
        }

        let fallback = self.providers.create(ProviderKind::Libre, None);
        fallback.translate(text, target).await.unwrap_or_else(|e| {
            warn!("terminal fallback failed, returning text unchanged: {e}");
            text.to_string()
        })
    }
}

fn validate(text: &str, target: &Lang) -> Result<()> {
    if text.trim().is_empty() {
        return Err(Error::InvalidInput("text must not be empty".to_string()));
    }
    if target.as_str().trim().is_empty() {
        return Err(Error::InvalidInput(
            "target language must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_empty_text() {
        assert!(validate("", &Lang::new("en")).is_err());
        assert!(validate("   ", &Lang::new("en")).is_err());
    }

    #[test]
    fn test_validate_rejects_empty_target() {
        assert!(validate("Hello", &Lang::new("")).is_err());
    }

    #[test]
    fn test_validate_accepts_normal_input() {
        assert!(validate("Hello", &Lang::new("zh")).is_ok());
    }
}
