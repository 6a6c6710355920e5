use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

use crate::{
    error::Result,
    source::{EntropySource, OsEntropy},
};

/// Operations available on a cryptographically secure random generator.
///
/// Only [`fill_bytes`](SecureRandom::fill_bytes) has to be implemented; everything else is built on
/// top of it. An error from any operation means the entropy source is broken and must be treated as
/// fatal by the caller.
pub trait SecureRandom {
    /// Fills `dest` with secure random bytes, replacing all of its contents.
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<()>;

    /// Returns `len` secure random bytes. A length of zero yields an empty vector.
    ///
    /// # Example
    /// ```
    /// # use secrand::{SecureRandom, SecureRng};
    /// let rng = SecureRng::new();
    /// let nonce = rng.random_bytes(16)?;
    /// assert_eq!(nonce.len(), 16);
    /// # Ok::<(), secrand::Error>(())
    /// ```
    fn random_bytes(&self, len: usize) -> Result<Vec<u8>> {
        let mut bytes = vec![0; len];
        self.fill_bytes(&mut bytes)?;
        Ok(bytes)
    }

    /// Returns a random string over the URL-safe base64 alphabet (`A-Z a-z 0-9 - _`), unpadded.
    ///
    /// The string encodes `len * 6 / 8` random bytes, so its length follows from the byte count
    /// and comes out one short of `len` when `len % 4 == 1` (`len = 5` gives 3 bytes and 4
    /// characters).
    ///
    /// # Example
    /// ```
    /// # use secrand::{SecureRandom, SecureRng};
    /// let rng = SecureRng::new();
    /// let token = rng.random_string(32)?;
    /// assert_eq!(token.len(), 32);
    /// # Ok::<(), secrand::Error>(())
    /// ```
    fn random_string(&self, len: usize) -> Result<String> {
        let bytes = self.random_bytes(len * 6 / 8)?;
        Ok(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Returns a value uniformly distributed in `[0, bound)`.
    ///
    /// # Panics
    /// Panics if `bound` is not positive.
    ///
    /// # Example
    /// ```
    /// # use secrand::{SecureRandom, SecureRng};
    /// let rng = SecureRng::new();
    /// let value: u32 = rng.random_int(10)?;
    /// assert!(value < 10);
    /// # Ok::<(), secrand::Error>(())
    /// ```
    fn random_int<T>(&self, bound: T) -> Result<T>
    where
        T: RandomBelow,
        Self: Sized,
    {
        T::random_below(self, bound)
    }
}

#[derive(Clone, Debug, Default)]
/// A random generator that hands out bytes from a secure entropy source.
///
/// The generator holds no state besides the source. All operations take `&self`, so one instance
/// can be shared between threads as long as the source can.
pub struct SecureRng<S = OsEntropy> {
    source: S,
}

impl SecureRng {
    /// Returns a generator backed by the operating system CSPRNG.
    ///
    /// # Example
    /// ```
    /// # use secrand::{SecureRandom, SecureRng};
    /// let rng = SecureRng::new();
    /// let key = rng.random_bytes(32)?;
    /// # Ok::<(), secrand::Error>(())
    /// ```
    pub fn new() -> Self {
        Self { source: OsEntropy }
    }
}

impl<S> SecureRng<S>
where
    S: EntropySource,
{
    /// Returns a generator that draws from `source`.
    pub fn with_source(source: S) -> Self {
        Self { source }
    }

    /// Returns a reference to the underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Consumes the generator and returns the underlying source.
    pub fn into_source(self) -> S {
        self.source
    }
}

impl<S> SecureRandom for SecureRng<S>
where
    S: EntropySource,
{
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<()> {
        let len = dest.len();
        self.source
            .fill(dest)
            .inspect_err(|error| log::error!("failed to read {len} secure random bytes: {error}"))
    }
}

/// Integer types that can be drawn uniformly from `[0, bound)`.
pub trait RandomBelow: Sized {
    /// Draws a value in `[0, bound)` from `generator`.
    ///
    /// Panics if `bound` is not positive.
    fn random_below<G>(generator: &G, bound: Self) -> Result<Self>
    where
        G: SecureRandom + ?Sized;
}

// Rejection sampling: read just enough big-endian bytes to cover `bound - 1`, mask off the excess
// high bits and try again whenever the candidate is out of range. Every attempt succeeds with
// probability above one half.
macro_rules! impl_unsigned_random_below {
    ($($int:ty),+) => {
        $(impl RandomBelow for $int {
            fn random_below<G>(generator: &G, bound: Self) -> Result<Self>
            where
                G: SecureRandom + ?Sized,
            {
                assert!(bound > 0, "cannot generate a value from an empty range");
                let max = bound - 1;
                let bits = <$int>::BITS - max.leading_zeros();
                if bits == 0 {
                    return Ok(0);
                }

                let len = bits.div_ceil(u8::BITS);
                let mask = u8::MAX >> (len * u8::BITS - bits);
                let mut buffer = [0; core::mem::size_of::<$int>()];
                let bytes = &mut buffer[..len as usize];
                loop {
                    generator.fill_bytes(bytes)?;
                    bytes[0] &= mask;
                    let value = bytes
                        .iter()
                        .fold(0_u128, |acc, &byte| (acc << u8::BITS) | u128::from(byte))
                        as $int;
                    if value < bound {
                        return Ok(value);
                    }
                }
            }
        })+
    };
}

macro_rules! impl_signed_random_below {
    ($($int:ty, $uint:ty),+) => {
        $(impl RandomBelow for $int {
            fn random_below<G>(generator: &G, bound: Self) -> Result<Self>
            where
                G: SecureRandom + ?Sized,
            {
                assert!(bound > 0, "cannot generate a value from an empty range");
                <$uint>::random_below(generator, bound as $uint).map(|value| value as $int)
            }
        })+
    };
}

impl_unsigned_random_below!(u8, u16, u32, u64, u128, usize);
impl_signed_random_below!(i8, u8, i16, u16, i32, u32, i64, u64, i128, u128, isize, usize);

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::source::ReaderSource;

    #[test]
    fn rejects_out_of_range_candidates() {
        // bound 10 masks each byte to its low nibble: 0xFF -> 15 and 0x1C -> 12 are rejected.
        let source = ReaderSource::new(io::Cursor::new(vec![0xFF, 0x1C, 0x05, 0x00]));
        let rng = SecureRng::with_source(&source);
        assert_eq!(rng.random_int(10_u32).unwrap(), 5);
        assert_eq!(source.into_inner().position(), 3);
    }

    #[test]
    fn reads_big_endian_bytes() {
        // 999 needs 10 bits: two bytes, top byte masked to 0x03.
        let source = ReaderSource::new(io::Cursor::new(vec![0xFD, 0x02]));
        let rng = SecureRng::with_source(source);
        assert_eq!(rng.random_int(1000_u64).unwrap(), 0x0102);
    }

    #[test]
    fn full_width_bound() {
        let mut bytes = vec![0xFF; 8];
        bytes.extend([0, 0, 0, 0, 0, 0, 0, 1]);
        let rng = SecureRng::with_source(ReaderSource::new(io::Cursor::new(bytes)));
        assert_eq!(rng.random_int(u64::MAX).unwrap(), 1);
    }

    #[test]
    fn power_of_two_bound() {
        let rng = SecureRng::with_source(ReaderSource::new(io::repeat(0xFF)));
        assert_eq!(rng.random_int(256_u16).unwrap(), 255);
        assert_eq!(rng.random_int(128_u8).unwrap(), 127);
    }

    #[test]
    fn signed_bound() {
        let rng = SecureRng::with_source(ReaderSource::new(io::repeat(0x03)));
        assert_eq!(rng.random_int(4_i32).unwrap(), 3);
    }
}
