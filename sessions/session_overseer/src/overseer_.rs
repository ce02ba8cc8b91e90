use crate::SessionRequest;
use biscotti::ResponseCookies;
use errors::{DeleteError, GetError, ResetExpiryError, SetError};

/// The entrypoint to session management.
///
/// It is a thin wrapper
/// [around your chosen backend implementation][`Overseer`],
/// removing the need to specify the concrete type of the backend
/// everywhere in your code.
#[derive(Debug)]
pub struct SessionOverseer(Box<dyn Overseer>);

impl SessionOverseer {
    /// Creates a new session overseer using the provided backend.
    pub fn new<Backend>(backend: Backend) -> Self
    where
        Backend: Overseer + 'static,
    {
        Self(Box::new(backend))
    }

    /// Retrieve the session value attached to the current request.
    ///
    /// Values written earlier in the same request take precedence over
    /// the cookies sent by the client.
    pub async fn get(&self, request: &SessionRequest<'_>) -> Result<String, GetError> {
        self.0.get(request).await
    }

    /// Replace the session value.
    ///
    /// The outgoing cookie is added to `response_cookies`, and the new value
    /// is recorded in the write cache of `request`.
    pub async fn set(
        &self,
        response_cookies: &mut ResponseCookies<'static>,
        request: &mut SessionRequest<'_>,
        value: String,
    ) -> Result<(), SetError> {
        self.0.set(response_cookies, request, value).await
    }

    /// End the session.
    pub async fn delete(
        &self,
        response_cookies: &mut ResponseCookies<'static>,
        request: &mut SessionRequest<'_>,
    ) -> Result<(), DeleteError> {
        self.0.delete(response_cookies, request).await
    }

    /// Push the session expiry forward, leaving the session value unchanged.
    ///
    /// It fails with a "no session" error if there is no active session.
    pub async fn reset_expiry(
        &self,
        response_cookies: &mut ResponseCookies<'static>,
        request: &mut SessionRequest<'_>,
    ) -> Result<(), ResetExpiryError> {
        self.0.reset_expiry(response_cookies, request).await
    }
}

#[async_trait::async_trait(?Send)]
/// The interface of a session backend.
///
/// Implementations must honour the following contract:
///
/// - [`get`](Overseer::get) never mutates anything. It returns a
///   [`NoSessionError`](errors::NoSessionError) if there is no usable session,
///   be it because the client didn't send one or because the one it sent can't be trusted.
/// - [`set`](Overseer::set) records the new value in the request write cache,
///   so that a later `get` in the same request observes it.
/// - [`delete`](Overseer::delete) records a deletion in the request write cache,
///   so that a later `get` in the same request reports no session.
/// - [`reset_expiry`](Overseer::reset_expiry) fails with a "no session" error
///   if `get` would.
pub trait Overseer: std::fmt::Debug + Send + Sync {
    /// Retrieve the session value attached to the current request.
    async fn get(&self, request: &SessionRequest<'_>) -> Result<String, GetError>;

    /// Replace the session value.
    async fn set(
        &self,
        response_cookies: &mut ResponseCookies<'static>,
        request: &mut SessionRequest<'_>,
        value: String,
    ) -> Result<(), SetError>;

    /// End the session.
    async fn delete(
        &self,
        response_cookies: &mut ResponseCookies<'static>,
        request: &mut SessionRequest<'_>,
    ) -> Result<(), DeleteError>;

    /// Push the session expiry forward, leaving the session value unchanged.
    async fn reset_expiry(
        &self,
        response_cookies: &mut ResponseCookies<'static>,
        request: &mut SessionRequest<'_>,
    ) -> Result<(), ResetExpiryError>;
}

/// Errors that can occur when interacting with an overseer.
pub mod errors {
    #[derive(Debug, thiserror::Error)]
    #[error("There is no active session")]
    /// There is no usable session attached to the current request.
    ///
    /// Either the client didn't send a session cookie, the session was deleted
    /// earlier in the same request, or the cookie failed verification.
    pub struct NoSessionError;

    #[derive(Debug, thiserror::Error)]
    #[error("Failed to gather randomness from the operating system")]
    /// The cryptographically secure random source failed.
    pub struct RandomSourceError {
        #[source]
        pub source: anyhow::Error,
    }

    #[non_exhaustive]
    #[derive(Debug, thiserror::Error)]
    /// The error returned by [`Overseer::get`][super::Overseer::get].
    pub enum GetError {
        #[error(transparent)]
        /// There is no active session.
        NoSession(#[from] NoSessionError),
        /// Something else went wrong when retrieving the session value.
        #[error("Something went wrong when retrieving the session value.")]
        Other(#[source] anyhow::Error),
    }

    impl GetError {
        /// Returns `true` if the operation failed because there is no active session.
        pub fn is_no_session(&self) -> bool {
            matches!(self, GetError::NoSession(_))
        }
    }

    #[non_exhaustive]
    #[derive(Debug, thiserror::Error)]
    /// The error returned by [`Overseer::set`][super::Overseer::set].
    pub enum SetError {
        #[error(transparent)]
        RandomSource(#[from] RandomSourceError),
        /// Something else went wrong when setting the session value.
        #[error("Something went wrong when setting the session value.")]
        Other(#[source] anyhow::Error),
    }

    #[non_exhaustive]
    #[derive(Debug, thiserror::Error)]
    /// The error returned by [`Overseer::delete`][super::Overseer::delete].
    pub enum DeleteError {
        /// Something went wrong when deleting the session.
        #[error("Something went wrong when deleting the session.")]
        Other(#[source] anyhow::Error),
    }

    #[non_exhaustive]
    #[derive(Debug, thiserror::Error)]
    /// The error returned by [`Overseer::reset_expiry`][super::Overseer::reset_expiry].
    pub enum ResetExpiryError {
        #[error(transparent)]
        /// There is no active session.
        NoSession(#[from] NoSessionError),
        #[error(transparent)]
        RandomSource(#[from] RandomSourceError),
        /// Something else went wrong when pushing the session expiry forward.
        #[error("Something went wrong when pushing the session expiry forward.")]
        Other(#[source] anyhow::Error),
    }

    impl ResetExpiryError {
        /// Returns `true` if the operation failed because there is no active session.
        pub fn is_no_session(&self) -> bool {
            matches!(self, ResetExpiryError::NoSession(_))
        }
    }

    impl From<GetError> for ResetExpiryError {
        fn from(e: GetError) -> Self {
            match e {
                GetError::NoSession(e) => ResetExpiryError::NoSession(e),
                GetError::Other(e) => ResetExpiryError::Other(e),
            }
        }
    }

    impl From<SetError> for ResetExpiryError {
        fn from(e: SetError) -> Self {
            match e {
                SetError::RandomSource(e) => ResetExpiryError::RandomSource(e),
                SetError::Other(e) => ResetExpiryError::Other(e),
            }
        }
    }
}
