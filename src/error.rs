use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError
{
    #[error("{0}")]
    Usage(String),

    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to start logging: {0}")]
    Logging(String),
}

#[derive(Debug, Error)]
pub enum ConfigError
{
    #[error("failed to read config file {path}: {source}")]
    Read
    {
        path: PathBuf,
        source: io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse
    {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("unknown default theme '{0}'")]
    UnknownTheme(String),
}

#[derive(Debug, Error)]
pub enum StoreError
{
    #[error("storage i/o failed: {0}")]
    Io(#[from] io::Error),

    #[error("record encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no game found for link '{0}'")]
    NotFound(String),
}

/// Rejections raised while validating an image before it joins a draft.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError
{
    #[error("'{name}' is not an image ({mime})")]
    NotAnImage
    {
        name: String,
        mime: String,
    },

    #[error("'{name}' is {size} bytes, images must be 5MB or smaller")]
    TooLarge
    {
        name: String,
        size: u64,
    },

    #[error("failed to read '{name}': {reason}")]
    Unreadable
    {
        name: String,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum SubmitError
{
    #[error("image upload failed: {0}")]
    Upload(#[source] StoreError),

    #[error("saving the game failed: {0}")]
    Insert(#[source] StoreError),
}
