//! Error types for the ad mediation layer
//!
//! This module defines all error types used throughout the crate.
//!
//! Almost nothing here ever reaches host code: bootstrap, slot-creation
//! and ad-request failures are logged and absorbed at the unit boundary.
//! Only [`Error::Config`] surfaces, from construction and validation paths
//! the host invokes deliberately.

use thiserror::Error;

/// Result type alias for mediation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the ad mediation layer
#[derive(Error, Debug)]
pub enum Error {
    /// SDK script loading errors
    #[error("SDK bootstrap error: {0}")]
    Bootstrap(String),

    /// The platform declined to create an ad slot
    #[error("Slot creation failed: {0}")]
    SlotCreation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Video ad request or playback errors
    #[error("Ad request error: {0}")]
    AdRequest(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Platform-specific error
    #[error("Platform error ({platform}): {message}")]
    Platform {
        /// Platform name
        platform: String,
        /// Error message
        message: String,
    },

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an SDK bootstrap error
    pub fn bootstrap(msg: impl Into<String>) -> Self {
        Self::Bootstrap(msg.into())
    }

    /// Create a slot creation error
    pub fn slot_creation(msg: impl Into<String>) -> Self {
        Self::SlotCreation(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an ad request error
    pub fn ad_request(msg: impl Into<String>) -> Self {
        Self::AdRequest(msg.into())
    }

    /// Create a platform-specific error
    pub fn platform(platform: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Platform {
            platform: platform.into(),
            message: message.into(),
        }
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
