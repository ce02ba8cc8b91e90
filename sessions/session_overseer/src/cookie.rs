//! Cookie plumbing at the HTTP boundary.
//!
//! Most types are re-exports of the
//! [`biscotti@0.3`](https://docs.rs/biscotti/0.3) crate.
use errors::{ExtractRequestCookiesError, InjectResponseCookiesError};
use http::HeaderValue;
use http::header::{COOKIE, SET_COOKIE};

pub use biscotti::{
    Expiration, Processor, ProcessorConfig, RequestCookie, RequestCookies, ResponseCookie,
    ResponseCookieId, ResponseCookies, SameSite,
};

/// Parse cookies out of the headers of an incoming request.
///
/// Every `Cookie` header is taken into account.
pub fn extract_request_cookies<'request>(
    headers: &'request http::HeaderMap,
    processor: &Processor,
) -> Result<RequestCookies<'request>, ExtractRequestCookiesError> {
    let mut cookies = RequestCookies::new();
    for header in headers.get_all(COOKIE).into_iter() {
        let header = header.to_str()?;
        cookies.extend_from_header(header, processor)?;
    }
    Ok(cookies)
}

/// Attach cookies to the outgoing response.
///
/// It consumes [`ResponseCookies`] by value since no response cookies should be
/// added after this point.
pub fn inject_response_cookies<B>(
    mut response: http::Response<B>,
    response_cookies: ResponseCookies<'static>,
    processor: &Processor,
) -> Result<http::Response<B>, InjectResponseCookiesError> {
    for value in response_cookies.header_values(processor) {
        let value = HeaderValue::from_str(&value).map_err(|_| InjectResponseCookiesError {
            invalid_header_value: value,
        })?;
        response.headers_mut().append(SET_COOKIE, value);
    }
    Ok(response)
}

/// Errors that can occur when moving cookies across the HTTP boundary.
pub mod errors {
    pub use biscotti::errors::ParseError;
    use http::header::ToStrError;

    #[derive(Debug, thiserror::Error)]
    /// The error type returned by [`extract_request_cookies`](super::extract_request_cookies).
    pub enum ExtractRequestCookiesError {
        #[error("Some characters in the `Cookie` header aren't printable ASCII characters.")]
        InvalidHeaderValue(#[from] ToStrError),
        #[error("Failed to parse request cookies out of the `Cookie` header.")]
        ParseError(#[from] ParseError),
    }

    #[derive(Debug, thiserror::Error)]
    #[non_exhaustive]
    #[error("Some characters in the `Set-Cookie` header value are not printable ASCII characters.")]
    /// The error type returned by [`inject_response_cookies`](super::inject_response_cookies).
    pub struct InjectResponseCookiesError {
        /// The invalid header value.
        pub invalid_header_value: String,
    }
}
