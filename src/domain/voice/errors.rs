//! Voice Context - Errors

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VoiceError {
    #[error("Invalid voice id: {0:?}")]
    InvalidId(String),

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Unsupported gender: {0}")]
    UnsupportedGender(String),

    #[error("Voice not found in catalog: {0}")]
    NotInCatalog(String),
}
