/*!
Pluggable, tamper-evident HTTP session management.

# What is an overseer?

HTTP is stateless: every request stands on its own. To recognise a returning
client (e.g. a logged-in user) the server must attach some state to it and get
that state back on subsequent requests. That's what an **overseer** does.

An overseer exposes four operations, captured by the [`Overseer`] trait:

- **get**, retrieve the session value attached to the incoming request;
- **set**, replace it;
- **delete**, end the session;
- **reset expiry**, slide the session lifetime forward without touching its value.

The value itself is an opaque string: the overseer doesn't care about its
structure. If you want to store structured data, check out [`SessionState`][state::SessionState].

# Backends

Where the session value lives is up to the backend.
A cookie-resident backend, like the one provided by `session_overseer_cookie`,
stores the (encrypted) value in the cookie itself. A server-side backend would
store an opaque identifier in the cookie and keep the value in a database or a cache.
Both satisfy the same [`Overseer`] contract, so they can be swapped
without touching call sites: wrap the backend you picked at startup in a [`SessionOverseer`].

# Request lifecycle

1. Parse the incoming cookies with [`extract_request_cookies`][cookie::extract_request_cookies]
   and wrap them in a [`SessionRequest`].
2. Invoke the overseer as many times as you need. Writes are recorded in the
   request-scoped [`WriteCache`], so a read that follows a write observes it.
3. Attach the outgoing cookies to the response with
   [`inject_response_cookies`][cookie::inject_response_cookies].

## References

- [RFC 6265](https://datatracker.ietf.org/doc/html/rfc6265);
- [OWASP's session management cheat-sheet](https://cheatsheetseries.owasp.org/cheatsheets/Session_Management_Cheat_Sheet.html).
*/
pub mod config;
pub mod cookie;
mod overseer_;
mod request;
pub mod state;

pub use overseer_::{Overseer, SessionOverseer};
pub use request::{CachedSession, SessionRequest, WriteCache};

pub mod errors {
    //! The error taxonomy shared by all [`Overseer`][super::Overseer] implementations.
    pub use crate::overseer_::errors::*;
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
/// Configure how sessions are managed.
///
/// The default configuration follows
/// [OWASP's guidelines for secure session management](https://github.com/OWASP/ASVS/blob/67726f1976a759c58a82669d0dad3b16b9c04ecc/4.0/en/0x12-V3-Session-management.md).
pub struct SessionConfig {
    #[serde(default)]
    /// Configure the session cookie.
    pub cookie: crate::config::SessionCookieConfig,
}

impl SessionConfig {
    /// The default configuration for the given profile.
    ///
    /// It only differs from [`SessionConfig::default`] for [`Profile::Development`],
    /// where the session cookie is not marked as `Secure` so that it can be
    /// exchanged over plain HTTP on a local machine.
    ///
    /// [`Profile::Development`]: crate::config::Profile::Development
    pub fn for_profile(profile: crate::config::Profile) -> Self {
        Self {
            cookie: crate::config::SessionCookieConfig::for_profile(profile),
        }
    }

    /// Check that the configuration values are usable.
    pub fn validate(&self) -> Result<(), crate::config::InvalidSessionConfig> {
        self.cookie.validate()
    }
}
