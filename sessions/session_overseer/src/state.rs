//! Structured session values.
//!
//! An [`Overseer`](crate::Overseer) stores an opaque string.
//! [`SessionState`] layers a set of JSON key-value pairs on top of it.
use crate::errors::{GetError, SetError};
use crate::{SessionOverseer, SessionRequest};
use biscotti::ResponseCookies;
use errors::SaveStateError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use tracing_log_error::fields::{ERROR_DETAILS, ERROR_MESSAGE, error_details, error_message};

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
/// A set of key-value pairs attached to a session.
///
/// It is stored as a JSON object in the session value.
pub struct SessionState(HashMap<String, Value>);

impl SessionState {
    /// An empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieve the session state attached to the current request.
    ///
    /// It returns `None` if there is no active session, or if the session value
    /// is not a valid JSON object.
    #[tracing::instrument(name = "Load session state", level = tracing::Level::TRACE, skip_all)]
    pub async fn load(
        overseer: &SessionOverseer,
        request: &SessionRequest<'_>,
    ) -> Result<Option<Self>, GetError> {
        let value = match overseer.get(request).await {
            Ok(value) => value,
            Err(e) if e.is_no_session() => return Ok(None),
            Err(e) => return Err(e),
        };
        match serde_json::from_str(&value) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                tracing::event!(
                    tracing::Level::WARN,
                    { ERROR_MESSAGE } = error_message(&e),
                    { ERROR_DETAILS } = error_details(&e),
                    "The session value is not a valid session state, ignoring it."
                );
                Ok(None)
            }
        }
    }

    /// Serialize the state and store it as the new session value.
    #[tracing::instrument(name = "Save session state", level = tracing::Level::TRACE, skip_all)]
    pub async fn save(
        &self,
        overseer: &SessionOverseer,
        response_cookies: &mut ResponseCookies<'static>,
        request: &mut SessionRequest<'_>,
    ) -> Result<(), SaveStateError> {
        let value = serde_json::to_string(&self.0).map_err(SaveStateError::Serialization)?;
        overseer.set(response_cookies, request, value).await?;
        Ok(())
    }

    /// Get the value associated with `key`.
    ///
    /// If the value is not found, `None` is returned.
    /// If the value is found, but it cannot be deserialized into the expected type, an error is returned.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, serde_json::Error> {
        self.get_raw(key)
            .map(|value| serde_json::from_value(value.clone()))
            .transpose()
    }

    /// Get the raw JSON value associated with `key`.
    pub fn get_raw(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Set a value for the given key.
    ///
    /// If the key already exists, the value is updated and the old raw value is returned.
    /// If the value cannot be serialized, an error is returned and the state is left unchanged.
    pub fn insert<T: Serialize + ?Sized>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> Result<Option<Value>, serde_json::Error> {
        let value = serde_json::to_value(value)?;
        Ok(self.insert_raw(key, value))
    }

    /// Set a raw JSON value for the given key.
    ///
    /// If the key already exists, the value is updated and the old value is returned.
    pub fn insert_raw(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// Remove the value associated with `key`.
    ///
    /// If the key exists, the removed value is returned.
    pub fn remove_raw(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Remove all key-value pairs.
    ///
    /// This doesn't end the session: save an empty state or invoke
    /// [`SessionOverseer::delete`] for that.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// `true` if there are no key-value pairs.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The number of key-value pairs.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Errors that can occur when working with [`SessionState`].
pub mod errors {
    use super::SetError;

    #[derive(Debug, thiserror::Error)]
    #[non_exhaustive]
    /// The error returned by [`SessionState::save`][super::SessionState::save].
    pub enum SaveStateError {
        #[error("Failed to serialize the session state.")]
        Serialization(#[source] serde_json::Error),
        #[error("Failed to store the session state.")]
        Set(#[from] SetError),
    }
}
