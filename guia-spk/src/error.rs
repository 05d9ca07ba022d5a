//! Error types for guia-spk

use guia_core::Error as CoreError;
use thiserror::Error;

/// Speech pipeline errors
#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Speech engine unavailable: {0}")]
    Unavailable(String),

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

pub type Result<T> = std::result::Result<T, SpeechError>;
