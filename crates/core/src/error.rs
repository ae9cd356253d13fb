//! Unified error types for sorte.

use tokio_rusqlite::rusqlite;

/// Unified error type shared by the store, cache, and download layers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Backing file or cache directory cannot be created or opened.
    #[error("STORE_UNAVAILABLE: {0}")]
    StoreUnavailable(String),

    /// Operation attempted on a closed store handle.
    #[error("STORE_CLOSED: operation on a closed store")]
    StoreClosed,

    /// Database operation failed.
    #[error("STORE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Temp-tier record could not be encoded.
    #[error("CACHE_ERROR: invalid temp entry: {0}")]
    InvalidEntry(String),

    /// Invalid URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Network fetch failed.
    #[error("TRANSPORT_ERROR: {0}")]
    Transport(String),

    /// Lottery name not recognized.
    #[error("UNKNOWN_LOTTERY: {0}")]
    UnknownLottery(String),

    /// Requested ticket size outside the game's valid range.
    #[error("INVALID_PICK_COUNT: {0}")]
    InvalidPickCount(usize),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::StoreClosed,
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::StoreClosed,
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        match err {
            tokio_rusqlite::Error::ConnectionClosed => Error::StoreClosed,
            other => Error::Database(other),
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}
