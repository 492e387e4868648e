use thiserror::Error;

/// Unified error type for mail-translator-core
///
/// This enum encompasses all error cases that can occur in the library:
/// - Input validation at the public translation boundary
/// - Provider operations (API requests, responses, credentials)
/// - Cache operations (initialization, reading, writing)
/// - Configuration operations (loading, validation)
/// - General I/O operations
#[derive(Error, Debug)]
pub enum Error {
    // ==========================================================================
    // Input Errors
    // ==========================================================================
    /// Caller passed missing or unusable input to the public entry point
    #[error("invalid translation input: {0}")]
    InvalidInput(String),

    // ==========================================================================
    // Provider Errors
    // ==========================================================================
    /// Translation API request failed (transport, non-success status)
    #[error("translation API request failed: {0}")]
    ProviderRequest(String),

    /// Provider responded, but the payload lacked the expected fields
    #[error("invalid translation API response: {0}")]
    ProviderInvalidResponse(String),

    /// No AI runtime is bound for the built-in provider
    #[error("AI runtime not available")]
    RuntimeUnavailable,

    // ==========================================================================
    // Cache Errors
    // ==========================================================================
    /// Failed to initialize the cache
    #[error("failed to initialize cache: {0}")]
    CacheInit(String),

    /// Failed to write to cache
    #[error("failed to write to cache: {0}")]
    CacheWrite(String),

    // ==========================================================================
    // Configuration Errors
    // ==========================================================================
    /// Failed to load configuration file
    #[error("failed to load config: {0}")]
    ConfigLoad(String),

    // ==========================================================================
    // I/O Errors
    // ==========================================================================
    /// General I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
