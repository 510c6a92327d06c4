use thiserror::Error;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Unknown surface: {0}")]
    UnknownSurface(String),

    #[error("Invalid arguments for {surface}: {reason}")]
    InvalidArguments {
        surface: &'static str,
        reason: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Callback delivery needs a running async runtime")]
    NoRuntime,
}

pub type SurfaceResult<T> = Result<T, SurfaceError>;
