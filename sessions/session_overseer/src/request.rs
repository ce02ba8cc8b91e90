use biscotti::RequestCookies;
use std::collections::HashMap;

/// The session-related view over an incoming request.
///
/// It bundles the cookies sent by the client together with a [`WriteCache`],
/// the request-scoped memory of the session writes performed while
/// handling this request.
///
/// Build one per request and drop it when the response has been sent.
#[derive(Debug)]
pub struct SessionRequest<'request> {
    cookies: RequestCookies<'request>,
    write_cache: WriteCache,
}

impl<'request> SessionRequest<'request> {
    /// Wrap the cookies attached to an incoming request.
    ///
    /// The write cache starts empty.
    pub fn new(cookies: RequestCookies<'request>) -> Self {
        Self {
            cookies,
            write_cache: WriteCache::default(),
        }
    }

    /// The cookies sent by the client.
    pub fn cookies(&self) -> &RequestCookies<'request> {
        &self.cookies
    }

    /// The session writes performed so far while handling this request.
    pub fn write_cache(&self) -> &WriteCache {
        &self.write_cache
    }

    /// Mutable access to the write cache, for backends.
    pub fn write_cache_mut(&mut self) -> &mut WriteCache {
        &mut self.write_cache
    }
}

/// The outcome of the last session write for a given cookie name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedSession {
    /// A new value was written.
    Written(String),
    /// The session was deleted.
    Deleted,
}

/// Request-scoped memory of session writes, keyed by cookie name.
///
/// The `Set-Cookie` headers emitted by a write only reach the client with the
/// response. The write cache lets later reads within the same request observe
/// those writes anyway.
#[derive(Debug, Default, Clone)]
pub struct WriteCache(HashMap<String, CachedSession>);

impl WriteCache {
    /// The last write recorded for the given cookie name, if any.
    pub fn get(&self, name: &str) -> Option<&CachedSession> {
        self.0.get(name)
    }

    /// Record that `value` was written for the given cookie name.
    ///
    /// It replaces any earlier write or deletion.
    pub fn record_write(&mut self, name: impl Into<String>, value: String) {
        self.0.insert(name.into(), CachedSession::Written(value));
    }

    /// Record that the session carried by the given cookie name was deleted.
    pub fn record_deletion(&mut self, name: impl Into<String>) {
        self.0.insert(name.into(), CachedSession::Deleted);
    }
}
