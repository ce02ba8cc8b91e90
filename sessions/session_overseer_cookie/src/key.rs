use crate::errors::InvalidKeyLength;
use redact::Secret;
use ring::rand::{SecureRandom, SystemRandom};
use session_overseer::errors::RandomSourceError;

/// The length, in bytes, of a [`SecretKey`].
///
/// AES-256 requires a 256-bit key.
pub const SECRET_KEY_LEN: usize = 32;

/// The key used to encrypt and authenticate session cookies.
///
/// Generate it once, store it safely and load it at startup:
/// cookies issued with one key can't be read using another.
///
/// The key material never shows up in `Debug` output.
#[derive(Debug)]
pub struct SecretKey(Secret<[u8; SECRET_KEY_LEN]>);

impl SecretKey {
    /// Generate a new key using the operating system's secure random source.
    pub fn generate() -> Result<Self, RandomSourceError> {
        let mut bytes = [0u8; SECRET_KEY_LEN];
        SystemRandom::new()
            .fill(&mut bytes)
            .map_err(|e| RandomSourceError {
                source: anyhow::Error::new(e),
            })?;
        Ok(Self(Secret::new(bytes)))
    }

    /// Build a key out of raw bytes.
    ///
    /// It fails if `bytes` is not exactly [`SECRET_KEY_LEN`] bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, InvalidKeyLength> {
        let bytes: [u8; SECRET_KEY_LEN] = bytes.try_into().map_err(|_| InvalidKeyLength {
            expected: SECRET_KEY_LEN,
            actual: bytes.len(),
        })?;
        Ok(Self(Secret::new(bytes)))
    }

    pub(crate) fn expose(&self) -> &[u8; SECRET_KEY_LEN] {
        self.0.expose_secret()
    }
}

impl Clone for SecretKey {
    fn clone(&self) -> Self {
        Self(Secret::new(*self.expose()))
    }
}

impl TryFrom<&[u8]> for SecretKey {
    type Error = InvalidKeyLength;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(bytes)
    }
}
