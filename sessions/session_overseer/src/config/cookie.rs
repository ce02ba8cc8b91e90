use biscotti::SameSite;
use std::time::Duration;

use super::Profile;

/// Browsers clamp cookie lifetimes to 400 days, as mandated by
/// [RFC 6265bis](https://httpwg.org/http-extensions/draft-ietf-httpbis-rfc6265bis.html#name-the-max-age-attribute).
pub const MAX_AGE_LIMIT: Duration = Duration::from_secs(400 * 24 * 60 * 60);

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
/// Configure the cookie used to carry session information on the client-side.
pub struct SessionCookieConfig {
    /// The name of the session cookie.
    ///
    /// By default, the name is set to `id`.
    #[serde(default = "default_session_cookie_name")]
    pub name: String,
    /// Set the `Domain` attribute on the session cookie.
    ///
    /// By default, the attribute is not set: the cookie is host-only.
    #[serde(default)]
    pub domain: Option<String>,
    /// Set the `Path` attribute on the session cookie.
    ///
    /// By default, the attribute is set to `/`.
    #[serde(default = "default_session_cookie_path")]
    pub path: Option<String>,
    /// Set the `Secure` attribute on the session cookie.
    ///
    /// If the cookie is marked as `Secure`, it will only be transmitted when the connection is secure (e.g. over HTTPS).
    ///
    /// Default is `true`, unless you're using [`Profile::Development`].
    #[serde(default = "default_session_cookie_secure")]
    pub secure: bool,
    /// Set the `HttpOnly` attribute on the session cookie.
    ///
    /// If the cookie is marked as `HttpOnly`, it will not be visible to JavaScript
    /// snippets running in the browser.
    ///
    /// Default is `true`.
    #[serde(default = "default_session_cookie_http_only")]
    pub http_only: bool,
    /// Set the [`SameSite`] attribute on the session cookie.
    ///
    /// By default, the attribute is set to [`SameSite::Lax`].
    #[serde(default = "default_session_cookie_same_site")]
    #[serde(with = "same_site")]
    pub same_site: Option<SameSite>,
    /// How long the session should live after it was last set or refreshed.
    ///
    /// It's used to populate both the `Max-Age` and the `Expires` attributes
    /// if [`kind`](Self::kind) is set to [`SessionCookieKind::Persistent`].
    ///
    /// # Default
    ///
    /// The default value is 24 hours.
    #[serde(with = "humantime_serde", default = "default_max_age")]
    pub max_age: Duration,
    /// The kind of session cookie to use.
    ///
    /// By default, it is set to [`SessionCookieKind::Persistent`].
    #[serde(default)]
    pub kind: SessionCookieKind,
}

impl Default for SessionCookieConfig {
    fn default() -> Self {
        Self {
            name: default_session_cookie_name(),
            domain: None,
            path: default_session_cookie_path(),
            secure: default_session_cookie_secure(),
            http_only: default_session_cookie_http_only(),
            same_site: default_session_cookie_same_site(),
            max_age: default_max_age(),
            kind: Default::default(),
        }
    }
}

impl SessionCookieConfig {
    /// The default cookie configuration for the given profile.
    pub fn for_profile(profile: Profile) -> Self {
        let mut config = Self::default();
        if profile == Profile::Development {
            config.secure = false;
        }
        config
    }

    /// Check that the configured values can be used to build a valid `Set-Cookie` header.
    pub fn validate(&self) -> Result<(), InvalidSessionConfig> {
        if self.name.is_empty() {
            return Err(InvalidSessionConfig::EmptyCookieName);
        }
        if let Some(character) = self.name.chars().find(|c| !is_token_char(*c)) {
            return Err(InvalidSessionConfig::InvalidCookieName {
                name: self.name.clone(),
                character,
            });
        }
        let attributes = [("Domain", &self.domain), ("Path", &self.path)];
        for (attribute, value) in attributes {
            if let Some(value) = value {
                if value.chars().any(|c| c == ';' || c.is_ascii_control()) {
                    return Err(InvalidSessionConfig::InvalidAttribute {
                        attribute,
                        value: value.to_owned(),
                    });
                }
            }
        }
        if self.kind == SessionCookieKind::Persistent {
            if self.max_age.is_zero() {
                return Err(InvalidSessionConfig::ZeroMaxAge);
            }
            if self.max_age > MAX_AGE_LIMIT {
                return Err(InvalidSessionConfig::MaxAgeTooLarge {
                    max_age: self.max_age,
                });
            }
        }
        Ok(())
    }
}

/// Cookie names must be RFC 2616 tokens.
fn is_token_char(c: char) -> bool {
    c.is_ascii_graphic()
        && !matches!(
            c,
            '(' | ')'
                | '<'
                | '>'
                | '@'
                | ','
                | ';'
                | ':'
                | '\\'
                | '"'
                | '/'
                | '['
                | ']'
                | '?'
                | '='
                | '{'
                | '}'
        )
}

fn default_session_cookie_name() -> String {
    // See https://cheatsheetseries.owasp.org/cheatsheets/Session_Management_Cheat_Sheet.html#session-id-name-fingerprinting
    "id".to_string()
}

fn default_session_cookie_secure() -> bool {
    true
}

fn default_session_cookie_http_only() -> bool {
    true
}

fn default_session_cookie_path() -> Option<String> {
    Some("/".to_string())
}

fn default_session_cookie_same_site() -> Option<SameSite> {
    Some(SameSite::Lax)
}

fn default_max_age() -> Duration {
    Duration::from_secs(60 * 60 * 24)
}

/// The kind of cookie used to carry session information on the client-side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum SessionCookieKind {
    /// A persistent session cookie.
    ///
    /// The cookie will be stored on the client's device with an
    /// expiration date set by the server via the `Max-Age` and `Expires` attributes.
    ///
    /// This is the default.
    #[default]
    Persistent,
    /// A cookie that expires when the browser session ends.
    ///
    /// Each browser has its own concept of "browser session", e.g. the session
    /// doesn't necessarily end when the browser window or tab is closed.
    /// Both Firefox and Chrome restore the session when the browser is restarted,
    /// keeping all session cookies alive.
    Session,
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// The error returned by [`SessionCookieConfig::validate`].
pub enum InvalidSessionConfig {
    #[error("The session cookie name can't be empty")]
    EmptyCookieName,
    #[error("`{name}` is not a valid cookie name: `{character}` is not allowed")]
    InvalidCookieName { name: String, character: char },
    #[error("`{value}` is not a valid value for the `{attribute}` attribute of the session cookie")]
    InvalidAttribute {
        attribute: &'static str,
        value: String,
    },
    #[error("The max-age of a persistent session cookie must be greater than zero")]
    ZeroMaxAge,
    #[error(
        "The max-age of the session cookie can't exceed 400 days, got {}s",
        .max_age.as_secs()
    )]
    MaxAgeTooLarge { max_age: Duration },
}

// Deserialization and serialization routines for `same_site` attribute.
mod same_site {
    use biscotti::SameSite;
    use serde::{Deserializer, Serializer, de};
    use std::fmt;

    pub fn serialize<S>(value: &Option<SameSite>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(same_site) => {
                let same_site = match same_site {
                    SameSite::Strict => "Strict",
                    SameSite::Lax => "Lax",
                    SameSite::None => "None",
                };
                serializer.serialize_some(same_site)
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<SameSite>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SameSiteVisitor;

        impl<'de> de::Visitor<'de> for SameSiteVisitor {
            type Value = Option<SameSite>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or null")
            }

            fn visit_str<E>(self, value: &str) -> Result<Option<SameSite>, E>
            where
                E: de::Error,
            {
                match value {
                    "Strict" | "strict" => Ok(Some(SameSite::Strict)),
                    "Lax" | "lax" => Ok(Some(SameSite::Lax)),
                    "None" | "none" => Ok(Some(SameSite::None)),
                    _ => Err(de::Error::unknown_variant(
                        value,
                        &["Strict", "Lax", "None"],
                    )),
                }
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Option<SameSite>, D::Error>
            where
                D: Deserializer<'de>,
            {
                deserializer.deserialize_str(self)
            }

            fn visit_none<E>(self) -> Result<Option<SameSite>, E>
            where
                E: de::Error,
            {
                Ok(None)
            }

            fn visit_unit<E>(self) -> Result<Option<SameSite>, E>
            where
                E: de::Error,
            {
                Ok(None)
            }
        }

        deserializer.deserialize_option(SameSiteVisitor)
    }
}
