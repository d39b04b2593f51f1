use thiserror::Error;

/// Failures at the crate's I/O boundaries.
///
/// None of these end a game session; callers log them and fall back
/// to defaults, in-memory state or fixed text.
#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("could not parse {what}: {source}")]
    Parse {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("request failed: {0}")]
    Http(String),

    #[error("storage unavailable: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, Error>;
