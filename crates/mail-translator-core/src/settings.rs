use crate::config::TranslationConfig;

/// Source of translation settings.
///
/// The backing store (database, admin panel, environment) can change between
/// calls, so the service reads a fresh snapshot for every request instead of
/// holding one.
pub trait Settings: Send + Sync {
    fn translation_config(&self) -> TranslationConfig;
}

/// Fixed settings, for the CLI and for tests.
#[derive(Debug, Clone)]
pub struct StaticSettings {
    config: TranslationConfig,
}

impl StaticSettings {
    pub const fn new(config: TranslationConfig) -> Self {
        Self { config }
    }
}

impl Settings for StaticSettings {
    fn translation_config(&self) -> TranslationConfig {
        self.config.clone()
    }
}
