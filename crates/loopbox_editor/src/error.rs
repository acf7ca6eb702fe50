use loopbox_core::error::CoreError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditorError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("music version {0} is not in the loaded catalog")]
    UnknownMusicVersion(String),

    #[error("image version {0} is not in the loaded catalog")]
    UnknownImageVersion(String),
}

pub type Result<T> = std::result::Result<T, EditorError>;
