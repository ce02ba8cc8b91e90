use crate::errors::{ConstructionError, EncodeError};
use crate::{SecretKey, TokenCodec};
use biscotti::{Expiration, ResponseCookie, ResponseCookies};
use session_overseer::config::{SessionCookieConfig, SessionCookieKind};
use session_overseer::errors::{
    DeleteError, GetError, NoSessionError, ResetExpiryError, SetError,
};
use session_overseer::{CachedSession, Overseer, SessionOverseer, SessionRequest};
use time::OffsetDateTime;
use tracing_log_error::fields::{ERROR_DETAILS, ERROR_MESSAGE, error_details, error_message};

/// A stateless overseer that keeps the whole session value in the session cookie.
///
/// The value is encrypted and authenticated using AES-256-GCM (see [`TokenCodec`]):
/// clients can neither read nor forge it.
/// Cookies that fail verification are treated as if they were absent.
///
/// Nothing is stored on the server: there is no way to revoke a session
/// other than overwriting or deleting the cookie on the client, or changing the key.
#[derive(Debug)]
pub struct CookieOverseer {
    codec: TokenCodec,
    config: SessionCookieConfig,
}

impl CookieOverseer {
    /// Build a new cookie overseer.
    ///
    /// It fails if the configuration is [invalid](SessionCookieConfig::validate).
    pub fn new(config: SessionCookieConfig, key: &SecretKey) -> Result<Self, ConstructionError> {
        config.validate()?;
        let codec = TokenCodec::new(key)?;
        Ok(Self { codec, config })
    }

    fn current_value(&self, request: &SessionRequest<'_>) -> Result<String, NoSessionError> {
        match request.write_cache().get(&self.config.name) {
            Some(CachedSession::Written(value)) => return Ok(value.clone()),
            Some(CachedSession::Deleted) => return Err(NoSessionError),
            None => {}
        }
        let cookie = request
            .cookies()
            .get(&self.config.name)
            .ok_or(NoSessionError)?;
        match self.codec.decode(cookie.value()) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::event!(
                    tracing::Level::WARN,
                    { ERROR_MESSAGE } = error_message(&e),
                    { ERROR_DETAILS } = error_details(&e),
                    "Invalid session cookie, ignoring it."
                );
                Err(NoSessionError)
            }
        }
    }

    /// A cookie carrying the configured name and attributes.
    fn cookie(&self, value: String) -> ResponseCookie<'static> {
        let config = &self.config;
        let mut cookie = ResponseCookie::new(config.name.clone(), value);
        if let Some(domain) = config.domain.as_deref() {
            cookie = cookie.set_domain(domain.to_owned());
        }
        if let Some(path) = config.path.as_deref() {
            cookie = cookie.set_path(path.to_owned());
        }
        if let Some(same_site) = config.same_site {
            cookie = cookie.set_same_site(same_site);
        }
        if config.secure {
            cookie = cookie.set_secure(true);
        }
        if config.http_only {
            cookie = cookie.set_http_only(true);
        }
        cookie
    }
}

#[async_trait::async_trait(?Send)]
impl Overseer for CookieOverseer {
    #[tracing::instrument(name = "Get session value", level = tracing::Level::TRACE, skip_all)]
    async fn get(&self, request: &SessionRequest<'_>) -> Result<String, GetError> {
        Ok(self.current_value(request)?)
    }

    #[tracing::instrument(name = "Set session value", level = tracing::Level::TRACE, skip_all)]
    async fn set(
        &self,
        response_cookies: &mut ResponseCookies<'static>,
        request: &mut SessionRequest<'_>,
        value: String,
    ) -> Result<(), SetError> {
        let token = self.codec.encode(&value).map_err(set_error)?;
        let mut cookie = self.cookie(token);
        if self.config.kind == SessionCookieKind::Persistent {
            let max_age = time::Duration::try_from(self.config.max_age)
                .unwrap_or(time::Duration::MAX);
            cookie = cookie.set_max_age(max_age);
            if let Some(expires) = OffsetDateTime::now_utc().checked_add(max_age) {
                cookie = cookie.set_expires(Expiration::DateTime(expires));
            }
        }
        response_cookies.insert(cookie);
        request
            .write_cache_mut()
            .record_write(self.config.name.clone(), value);
        Ok(())
    }

    #[tracing::instrument(name = "Delete session", level = tracing::Level::TRACE, skip_all)]
    async fn delete(
        &self,
        response_cookies: &mut ResponseCookies<'static>,
        request: &mut SessionRequest<'_>,
    ) -> Result<(), DeleteError> {
        let now = OffsetDateTime::now_utc();
        let a_year_ago = now
            .replace_year(now.year() - 1)
            .unwrap_or(now - time::Duration::days(365));
        let cookie = self
            .cookie(String::new())
            .set_max_age(time::Duration::ZERO)
            .set_expires(Expiration::DateTime(a_year_ago));
        response_cookies.insert(cookie);
        request
            .write_cache_mut()
            .record_deletion(self.config.name.clone());
        Ok(())
    }

    /// Re-issue the current value with a fresh expiry.
    ///
    /// The `Expires` attribute has a one-second resolution on the wire: two
    /// refreshes within the same second produce the same header.
    #[tracing::instrument(name = "Reset session expiry", level = tracing::Level::TRACE, skip_all)]
    async fn reset_expiry(
        &self,
        response_cookies: &mut ResponseCookies<'static>,
        request: &mut SessionRequest<'_>,
    ) -> Result<(), ResetExpiryError> {
        let value = self.current_value(request)?;
        self.set(response_cookies, request, value).await?;
        Ok(())
    }
}

impl From<CookieOverseer> for SessionOverseer {
    fn from(overseer: CookieOverseer) -> Self {
        SessionOverseer::new(overseer)
    }
}

/// A failing random source is a hard error, never a missing session.
fn set_error(e: EncodeError) -> SetError {
    match e {
        EncodeError::RandomSource(e) => SetError::RandomSource(e),
        e => SetError::Other(e.into()),
    }
}
