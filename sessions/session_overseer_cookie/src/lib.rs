//! A stateless, cookie-resident session backend for `session_overseer`.
//!
//! The whole session value travels with the client, inside the session cookie.
//! It is encrypted and authenticated with AES-256-GCM: clients can't read it,
//! and any modification is detected and treated as "no session".
//!
//! # Usage
//!
//! ```rust,no_run
//! use session_overseer::SessionOverseer;
//! use session_overseer::config::SessionCookieConfig;
//! use session_overseer_cookie::{CookieOverseer, SecretKey};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load your key from a secret store: this is just for illustration.
//! let key = SecretKey::generate()?;
//! let overseer: SessionOverseer = CookieOverseer::new(SessionCookieConfig::default(), &key)?.into();
//! # Ok(())
//! # }
//! ```
mod codec;
pub mod errors;
mod key;
mod overseer;

pub use codec::TokenCodec;
pub use key::{SECRET_KEY_LEN, SecretKey};
pub use overseer::CookieOverseer;
