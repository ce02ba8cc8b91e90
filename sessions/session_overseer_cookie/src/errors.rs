//! Errors that can occur when working with cookie-resident sessions.
use session_overseer::config::InvalidSessionConfig;
use session_overseer::errors::RandomSourceError;

#[derive(Debug, thiserror::Error)]
#[error("The secret key must be {expected} bytes long, got {actual} bytes")]
/// The key material has the wrong length for AES-256-GCM.
pub struct InvalidKeyLength {
    pub expected: usize,
    pub actual: usize,
}

#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
/// The error returned by [`CookieOverseer::new`](crate::CookieOverseer::new).
pub enum ConstructionError {
    #[error(transparent)]
    InvalidKeyLength(#[from] InvalidKeyLength),
    #[error("Invalid session cookie configuration")]
    InvalidConfig(#[from] InvalidSessionConfig),
}

#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
/// The error returned by [`TokenCodec::encode`](crate::TokenCodec::encode).
pub enum EncodeError {
    #[error(transparent)]
    RandomSource(#[from] RandomSourceError),
    #[error("The session value is too large to be encrypted")]
    PayloadTooLarge,
}

#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
/// The error returned by [`TokenCodec::decode`](crate::TokenCodec::decode).
pub enum DecodeError {
    #[error("The token is not valid URL-safe base64")]
    Malformed(#[source] base64::DecodeError),
    #[error("The token is too short to contain a nonce")]
    Truncated,
    #[error("The token failed authentication")]
    Tampered,
    #[error("The decrypted session value is not valid UTF-8")]
    NotUtf8(#[source] std::string::FromUtf8Error),
}
