use thiserror::Error;

/// Canonical result for logbuf.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("allocation failed for a {bytes} byte message buffer")]
    AllocFailed { bytes: usize },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("unknown log level '{0}'")]
    UnknownLevel(String),

    #[error("config parse error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e.to_string())
    }
}
