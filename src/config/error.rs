//! Configuration errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] ValidationError),
}

/// A setting that parsed but cannot be used.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingRequired(&'static str),

    #[error("cannot bind to {0:?}")]
    InvalidAddress(String),

    #[error("port must not be 0")]
    InvalidPort,

    #[error("request timeout must be between 1 and 300 seconds")]
    InvalidTimeout,

    #[error("{field} is not an http(s) URL: {value}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("image size {0:?} is not WIDTHxHEIGHT")]
    InvalidImageSize(String),

    #[error("sample size must be between 1 and {max}, got {actual}")]
    InvalidSampleSize { max: usize, actual: usize },

    #[error("{0} must be greater than zero")]
    MustBePositive(&'static str),
}
