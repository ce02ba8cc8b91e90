//! Types to configure how sessions are managed.
//!
//! [`SessionCookieConfig`] controls the attributes of the session cookie,
//! while [`ConfigLoader`] assembles a [`SessionConfig`](crate::SessionConfig)
//! out of configuration files and environment variables.
mod cookie;
mod loader;
mod profile;

pub use cookie::{InvalidSessionConfig, MAX_AGE_LIMIT, SessionCookieConfig, SessionCookieKind};
pub use loader::{ConfigLoadError, ConfigLoader};
pub use profile::{PROFILE_ENV_VAR, Profile, ProfileLoadError, UnknownProfileError};
