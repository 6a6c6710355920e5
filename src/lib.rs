//! Cryptographically secure random values for tokens, keys and identifiers.
//!
//! [`SecureRng`] wraps a secure byte source (the operating system CSPRNG by default) and offers
//! bounded integers, byte buffers and URL-safe random strings. The process-wide [`RNG`] instance
//! backs the free functions of this crate, so most callers never construct one themselves.
//!
//! This is not a general purpose PRNG: it cannot be seeded and its output is not reproducible.
//!
//! # Errors
//!
//! Every operation returns [`Result`]. An [`Error`] means the entropy source is broken; callers
//! should treat it as fatal and never fall back to a weaker generator.
//!
//! # Example
//! ```
//! let session_id = secrand::random_string(32)?;
//! let die: u8 = secrand::random_int(6)?;
//! let nonce = secrand::random_bytes(12)?;
//! # assert!(die < 6);
//! # assert_eq!(nonce.len(), 12);
//! # assert_eq!(session_id.len(), 32);
//! # Ok::<(), secrand::Error>(())
//! ```

use std::sync::LazyLock;

pub mod error;
#[cfg(feature = "rand")]
mod rand_support;
mod rng;
pub mod source;

pub use error::{Error, Result};
pub use rng::{RandomBelow, SecureRandom, SecureRng};
pub use source::{EntropySource, OsEntropy, ReaderSource};


/// A process-wide generator backed by the operating system CSPRNG, created on first use.
pub static RNG: LazyLock<SecureRng> = LazyLock::new(SecureRng::new);

/// Returns a value uniformly distributed in `[0, bound)`, using [`RNG`].
///
/// # Panics
/// Panics if `bound` is not positive.
pub fn random_int<T>(bound: T) -> Result<T>
where
    T: RandomBelow,
{
    RNG.random_int(bound)
}

/// Returns `len` secure random bytes, using [`RNG`].
pub fn random_bytes(len: usize) -> Result<Vec<u8>> {
    RNG.random_bytes(len)
}

/// Fills `dest` with secure random bytes, using [`RNG`].
pub fn fill_bytes(dest: &mut [u8]) -> Result<()> {
    RNG.fill_bytes(dest)
}

/// Returns a random URL-safe base64 string, using [`RNG`]. See [`SecureRandom::random_string`]
/// for how `len` maps to the output length.
pub fn random_string(len: usize) -> Result<String> {
    RNG.random_string(len)
}
