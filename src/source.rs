use std::{io::Read, sync::Arc, sync::Mutex};

use crate::error::{Error, Result};

/// A source of cryptographically secure random bytes.
///
/// Implementations either fill the whole of `dest` or return an error. They must be safe to share
/// between threads, since a single provider is used concurrently.
pub trait EntropySource: Send + Sync {
    /// Fills `dest` completely with secure random bytes.
    fn fill(&self, dest: &mut [u8]) -> Result<()>;
}

#[derive(Clone, Copy, Debug, Default)]
/// The operating system CSPRNG, reached through `getrandom`.
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, dest: &mut [u8]) -> Result<()> {
        getrandom::fill(dest)?;
        Ok(())
    }
}

#[derive(Debug)]
/// Adapts any reader, such as an open `/dev/urandom`, into an entropy source.
///
/// Reads are serialized with a mutex and use `read_exact`, so a reader that ends early is reported
/// as a failure instead of leaving the tail of the buffer untouched.
pub struct ReaderSource<R> {
    reader: Mutex<R>,
}

impl<R> ReaderSource<R>
where
    R: Read + Send,
{
    /// Wraps `reader`. The reader must yield secure random bytes; nothing here checks that.
    pub fn new(reader: R) -> Self {
        Self {
            reader: Mutex::new(reader),
        }
    }

    /// Returns the wrapped reader.
    pub fn into_inner(self) -> R {
        match self.reader.into_inner() {
            Ok(reader) => reader,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<R> EntropySource for ReaderSource<R>
where
    R: Read + Send,
{
    fn fill(&self, dest: &mut [u8]) -> Result<()> {
        let mut reader = self
            .reader
            .lock()
            .map_err(|_| Error::entropy_source("reader lock poisoned"))?;
        reader.read_exact(dest)?;
        Ok(())
    }
}

impl<S> EntropySource for &S
where
    S: EntropySource + ?Sized,
{
    fn fill(&self, dest: &mut [u8]) -> Result<()> {
        (**self).fill(dest)
    }
}

impl<S> EntropySource for Box<S>
where
    S: EntropySource + ?Sized,
{
    fn fill(&self, dest: &mut [u8]) -> Result<()> {
        (**self).fill(dest)
    }
}

impl<S> EntropySource for Arc<S>
where
    S: EntropySource + ?Sized,
{
    fn fill(&self, dest: &mut [u8]) -> Result<()> {
        (**self).fill(dest)
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[test]
    fn os_entropy_fills() {
        let mut buffer = [0; 64];
        OsEntropy.fill(&mut buffer).unwrap();
        assert_ne!(buffer, [0; 64]);
    }

    #[test]
    fn os_entropy_accepts_empty_buffer() {
        let mut buffer: [u8; 0] = [];
        OsEntropy.fill(&mut buffer).unwrap();
    }

    #[test]
    fn reader_source_reads_exactly() {
        let source = ReaderSource::new(io::Cursor::new(vec![1, 2, 3, 4, 5]));
        let mut buffer = [0; 3];
        source.fill(&mut buffer).unwrap();
        assert_eq!(buffer, [1, 2, 3]);
        assert_eq!(source.into_inner().position(), 3);
    }

    #[test]
    fn reader_source_short_read_fails() {
        let source = ReaderSource::new(io::Cursor::new(vec![7; 4]));
        let mut buffer = [0; 8];
        let error = source.fill(&mut buffer).unwrap_err();
        assert!(matches!(error, Error::EntropySource(_)));
    }

    #[test]
    fn boxed_source_forwards() {
        let source: Box<dyn EntropySource> = Box::new(ReaderSource::new(io::repeat(0xAB)));
        let mut buffer = [0; 16];
        source.fill(&mut buffer).unwrap();
        assert_eq!(buffer, [0xAB; 16]);
    }
}
