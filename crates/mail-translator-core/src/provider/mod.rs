mod builtin;
mod deepl;
mod google;
mod mymemory;

pub use builtin::{AiRuntime, BuiltinTranslator, CloudflareAi, BUILTIN_MODEL};
pub use deepl::DeeplTranslator;
pub use google::GoogleTranslator;
pub use mymemory::MyMemoryTranslator;

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{Lang, ProviderKind, RuntimeConfig};
use crate::error::Result;

/// Information about a translation backend
#[derive(Debug, Clone)]
pub struct ProviderInfo {
    /// Human-readable name
    pub name: &'static str,
    /// Whether this backend requires an API key
    pub requires_api_key: bool,
}

/// Trait for translation backends.
///
/// Implementations translate one chunk at a time; the caller guarantees the
/// text is already within provider size limits.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Get information about this backend
    fn info(&self) -> ProviderInfo;

    /// Get the backend name (convenience method)
    fn name(&self) -> &'static str {
        self.info().name
    }

    /// Translate a single chunk of plain text into the target language
    async fn translate(&self, text: &str, target: &Lang) -> Result<String>;
}

/// Creates provider adapters on demand.
///
/// The selected provider and its credentials come from settings and can
/// change between calls, so adapters are built per request. Tests substitute
/// deterministic fakes here instead of touching the network.
pub trait ProviderFactory: Send + Sync {
    fn create(&self, kind: ProviderKind, api_key: Option<&str>) -> Arc<dyn Translator>;
}

/// Factory for the real reqwest-backed adapters, sharing one HTTP client.
pub struct HttpProviderFactory {
    client: Client,
    runtime: Option<Arc<dyn AiRuntime>>,
}

impl HttpProviderFactory {
    /// Create a factory, binding the AI runtime when one is configured.
    ///
    /// # Panics
    /// Panics if the HTTP client cannot be created, which should only happen
    /// in extreme circumstances (e.g., TLS backend unavailable on the system).
    #[allow(clippy::expect_used)]
    pub fn new(runtime_config: Option<&RuntimeConfig>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        let runtime: Option<Arc<dyn AiRuntime>> = runtime_config.map(|cfg| {
            Arc::new(CloudflareAi::new(client.clone(), cfg.clone())) as Arc<dyn AiRuntime>
        });

        Self { client, runtime }
    }

    /// Create a factory around an already-built runtime binding.
    #[allow(clippy::expect_used)]
    pub fn with_runtime(runtime: Option<Arc<dyn AiRuntime>>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, runtime }
    }
}

impl ProviderFactory for HttpProviderFactory {
    fn create(&self, kind: ProviderKind, api_key: Option<&str>) -> Arc<dyn Translator> {
        match kind {
            ProviderKind::Builtin => Arc::new(BuiltinTranslator::new(self.runtime.clone())),
            ProviderKind::Deepl => Arc::new(DeeplTranslator::new(
                self.client.clone(),
                api_key.unwrap_or_default().to_string(),
            )),
            ProviderKind::Google => Arc::new(GoogleTranslator::new(
                self.client.clone(),
                api_key.unwrap_or_default().to_string(),
            )),
            ProviderKind::Libre => Arc::new(MyMemoryTranslator::new(self.client.clone())),
        }
    }
}
