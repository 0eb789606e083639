use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing required argument: {arg}")]
    MissingArgument { arg: String },

    #[error("Exactly one of {args} may be given")]
    ConflictingInputs { args: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Library(#[from] pdfsplit::Error),

    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),
}
