use thiserror::Error;

use crate::config::ConfigError;
use crate::upload::UploadError;

/// Anything that stops the application from starting or running.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("window error: {0}")]
    Window(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Upload(#[from] UploadError),
}

impl From<minifb::Error> for AppError {
    fn from(e: minifb::Error) -> Self { AppError::Window(e.to_string()) }
}
