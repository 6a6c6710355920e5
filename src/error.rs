//! Errors raised by the secure random provider.
//!
//! There is a single failure mode: the entropy source could not supply the
//! requested bytes. Treat it as fatal. Retrying or falling back to another
//! generator would silently weaken the randomness handed out.

use thiserror::Error;

/// Standard result type for `secrand` operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The secure byte source failed or ran out before filling the buffer.
    #[error("secure entropy source failed: {0}")]
    EntropySource(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Wraps the underlying cause of an entropy source failure.
    pub fn entropy_source<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::EntropySource(error.into())
    }
}

impl From<getrandom::Error> for Error {
    fn from(error: getrandom::Error) -> Self {
        Self::entropy_source(error)
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::entropy_source(error)
    }
}
