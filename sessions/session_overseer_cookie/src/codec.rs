use crate::SecretKey;
use crate::errors::{DecodeError, EncodeError, InvalidKeyLength};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use ring::aead::{AES_256_GCM, Aad, LessSafeKey, NONCE_LEN, Nonce, UnboundKey};
use ring::rand::{SecureRandom, SystemRandom};
use session_overseer::errors::RandomSourceError;

/// Turns session values into tamper-evident, opaque tokens and back.
///
/// Tokens are the URL-safe base64 encoding (without padding) of
/// `nonce || ciphertext || tag`, sealed with AES-256-GCM.
/// Every call to [`encode`](TokenCodec::encode) uses a fresh random nonce:
/// encoding the same value twice yields two different tokens.
pub struct TokenCodec {
    key: LessSafeKey,
    rng: SystemRandom,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", self.key.algorithm())
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// Build a codec that owns its own copy of the key material.
    pub fn new(key: &SecretKey) -> Result<Self, InvalidKeyLength> {
        let bytes = key.expose();
        let key = UnboundKey::new(&AES_256_GCM, bytes).map_err(|_| InvalidKeyLength {
            expected: AES_256_GCM.key_len(),
            actual: bytes.len(),
        })?;
        Ok(Self {
            key: LessSafeKey::new(key),
            rng: SystemRandom::new(),
        })
    }

    /// Encrypt and authenticate `plaintext`.
    pub fn encode(&self, plaintext: &str) -> Result<String, EncodeError> {
        let mut nonce = [0u8; NONCE_LEN];
        self.rng.fill(&mut nonce).map_err(|e| RandomSourceError {
            source: anyhow::Error::new(e),
        })?;

        let tag_len = self.key.algorithm().tag_len();
        let mut token = Vec::with_capacity(NONCE_LEN + plaintext.len() + tag_len);
        token.extend_from_slice(&nonce);
        token.extend_from_slice(plaintext.as_bytes());
        let tag = self
            .key
            .seal_in_place_separate_tag(
                Nonce::assume_unique_for_key(nonce),
                Aad::empty(),
                &mut token[NONCE_LEN..],
            )
            .map_err(|_| EncodeError::PayloadTooLarge)?;
        token.extend_from_slice(tag.as_ref());

        Ok(URL_SAFE_NO_PAD.encode(token))
    }

    /// Verify and decrypt a token produced by [`encode`](TokenCodec::encode).
    ///
    /// It fails if the token was not produced using the same key, or if it
    /// was modified in any way.
    pub fn decode(&self, token: &str) -> Result<String, DecodeError> {
        let mut bytes = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(DecodeError::Malformed)?;
        if bytes.len() < NONCE_LEN {
            return Err(DecodeError::Truncated);
        }
        let (nonce, sealed) = bytes.split_at_mut(NONCE_LEN);
        let nonce = Nonce::try_assume_unique_for_key(nonce).map_err(|_| DecodeError::Truncated)?;
        let plaintext = self
            .key
            .open_in_place(nonce, Aad::empty(), sealed)
            .map_err(|_| DecodeError::Tampered)?;
        String::from_utf8(plaintext.to_vec()).map_err(DecodeError::NotUtf8)
    }
}
