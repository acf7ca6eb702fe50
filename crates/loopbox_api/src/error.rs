use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("project not found: {0}")]
    ProjectNotFound(String),

    #[error("music version not found: {0}")]
    MusicVersionNotFound(String),

    #[error("image version not found: {0}")]
    ImageVersionNotFound(String),

    #[error("backend rejected the request: {0}")]
    Rejected(String),

    #[error("transport error: {0}")]
    Transport(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;
