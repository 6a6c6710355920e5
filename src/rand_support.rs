use rand::{CryptoRng, RngCore};

use crate::{EntropySource, SecureRandom, SecureRng};

impl<S> RngCore for &SecureRng<S>
where
    S: EntropySource,
{
    fn next_u32(&mut self) -> u32 {
        let mut bytes = [0; 4];
        RngCore::fill_bytes(self, &mut bytes);
        u32::from_ne_bytes(bytes)
    }

    fn next_u64(&mut self) -> u64 {
        let mut bytes = [0; 8];
        RngCore::fill_bytes(self, &mut bytes);
        u64::from_ne_bytes(bytes)
    }

    // Panics when the source fails; `RngCore` has no error channel here.
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        if let Err(error) = self.try_fill_bytes(dest) {
            panic!("{error}");
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        SecureRandom::fill_bytes(*self, dest).map_err(rand::Error::new)
    }
}

impl<S> CryptoRng for &SecureRng<S> where S: EntropySource {}
