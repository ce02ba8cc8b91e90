//! Sessions travelling through real `Cookie` and `Set-Cookie` headers.
use googletest::{
    assert_that,
    prelude::{contains_substring, eq, len},
};
use http::header::{COOKIE, SET_COOKIE};
use session_overseer::SessionRequest;
use session_overseer::cookie::{
    Processor, ProcessorConfig, RequestCookies, ResponseCookies, extract_request_cookies,
    inject_response_cookies,
};

use crate::fixtures::overseer;

fn processor() -> Processor {
    ProcessorConfig::default().into()
}

/// Turn the `Set-Cookie` headers of a response into the `Cookie` header a browser would send back.
fn cookie_header(response: &http::Response<()>) -> http::HeaderValue {
    let pairs: Vec<String> = response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .map(|v| {
            let v = v.to_str().unwrap();
            v.split(';').next().unwrap().trim().to_owned()
        })
        .collect();
    http::HeaderValue::from_str(&pairs.join("; ")).unwrap()
}

#[tokio::test]
#[googletest::test]
async fn session_survives_a_round_trip_through_http_headers() {
    let overseer = overseer();
    let processor = processor();

    // First request: no cookies, the session gets created.
    let headers = http::HeaderMap::new();
    let mut request = SessionRequest::new(extract_request_cookies(&headers, &processor).unwrap());
    let mut response_cookies = ResponseCookies::new();
    overseer
        .set(&mut response_cookies, &mut request, "user_id=42".into())
        .await
        .unwrap();
    let response =
        inject_response_cookies(http::Response::new(()), response_cookies, &processor).unwrap();

    let set_cookies: Vec<_> = response.headers().get_all(SET_COOKIE).iter().collect();
    assert_that!(set_cookies, len(eq(1)));
    let set_cookie = set_cookies[0].to_str().unwrap();
    assert_that!(set_cookie, contains_substring("id="));
    assert_that!(set_cookie, contains_substring("Path=/"));
    assert_that!(set_cookie, contains_substring("Max-Age=86400"));
    assert_that!(set_cookie, contains_substring("Expires="));
    assert_that!(set_cookie, contains_substring("HttpOnly"));
    assert_that!(set_cookie, contains_substring("Secure"));
    assert_that!(set_cookie, contains_substring("SameSite=Lax"));
    assert!(!set_cookie.contains("user_id"));

    // Second request: the browser sends the cookie back.
    let mut headers = http::HeaderMap::new();
    headers.insert(COOKIE, cookie_header(&response));
    let request = SessionRequest::new(extract_request_cookies(&headers, &processor).unwrap());
    assert_eq!(overseer.get(&request).await.unwrap(), "user_id=42");
}

#[tokio::test]
#[googletest::test]
async fn deletion_travels_as_an_expired_cookie() {
    let overseer = overseer();
    let processor = processor();
    let headers = http::HeaderMap::new();
    let mut request = SessionRequest::new(extract_request_cookies(&headers, &processor).unwrap());
    let mut response_cookies = ResponseCookies::new();

    overseer
        .set(&mut response_cookies, &mut request, "user_id=42".into())
        .await
        .unwrap();
    overseer
        .delete(&mut response_cookies, &mut request)
        .await
        .unwrap();
    let response =
        inject_response_cookies(http::Response::new(()), response_cookies, &processor).unwrap();

    let set_cookies: Vec<_> = response.headers().get_all(SET_COOKIE).iter().collect();
    assert_that!(set_cookies, len(eq(1)));
    let set_cookie = set_cookies[0].to_str().unwrap();
    assert_that!(set_cookie, contains_substring("id=;"));
    assert_that!(set_cookie, contains_substring("Max-Age=0"));
    let last_year = (time::OffsetDateTime::now_utc().year() - 1).to_string();
    assert_that!(set_cookie, contains_substring(last_year));
}

#[tokio::test]
async fn cookies_from_multiple_headers_are_all_taken_into_account() {
    let overseer = overseer();
    let processor = processor();

    let mut response_cookies = ResponseCookies::new();
    let mut request = SessionRequest::new(RequestCookies::new());
    overseer
        .set(&mut response_cookies, &mut request, "user_id=42".into())
        .await
        .unwrap();
    let response =
        inject_response_cookies(http::Response::new(()), response_cookies, &processor).unwrap();

    let mut headers = http::HeaderMap::new();
    headers.append(COOKIE, http::HeaderValue::from_static("theme=dark"));
    headers.append(COOKIE, cookie_header(&response));
    let request = SessionRequest::new(extract_request_cookies(&headers, &processor).unwrap());
    assert_eq!(overseer.get(&request).await.unwrap(), "user_id=42");
}

#[test]
fn non_ascii_cookie_headers_are_rejected() {
    let processor = processor();
    let mut headers = http::HeaderMap::new();
    headers.insert(
        COOKIE,
        http::HeaderValue::from_bytes("id=caf\u{e9}".as_bytes()).unwrap(),
    );
    let err = extract_request_cookies(&headers, &processor).unwrap_err();
    insta::assert_snapshot!(err, @"Some characters in the `Cookie` header aren't printable ASCII characters.");
}

/// The `Expires` attribute of the single `Set-Cookie` header in `response`.
fn expires_attribute(response: &http::Response<()>) -> String {
    let set_cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
    set_cookie
        .split(';')
        .map(str::trim)
        .find_map(|attribute| attribute.strip_prefix("Expires="))
        .unwrap()
        .to_owned()
}

#[tokio::test]
#[googletest::test]
async fn a_reset_expiry_moves_the_expires_header_forward() {
    let overseer = overseer();
    let processor = processor();

    let mut request = SessionRequest::new(RequestCookies::new());
    let mut response_cookies = ResponseCookies::new();
    overseer
        .set(&mut response_cookies, &mut request, "user_id=42".into())
        .await
        .unwrap();
    let first_response =
        inject_response_cookies(http::Response::new(()), response_cookies, &processor).unwrap();
    let first_expires = expires_attribute(&first_response);

    // `Expires` has a one-second resolution.
    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

    let mut headers = http::HeaderMap::new();
    headers.insert(COOKIE, cookie_header(&first_response));
    let mut request = SessionRequest::new(extract_request_cookies(&headers, &processor).unwrap());
    let mut response_cookies = ResponseCookies::new();
    overseer
        .reset_expiry(&mut response_cookies, &mut request)
        .await
        .unwrap();
    let second_response =
        inject_response_cookies(http::Response::new(()), response_cookies, &processor).unwrap();

    assert_ne!(expires_attribute(&second_response), first_expires);
    let set_cookie = second_response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
    assert_that!(set_cookie, contains_substring("Max-Age=86400"));

    // The refreshed cookie still carries the original value.
    let mut headers = http::HeaderMap::new();
    headers.insert(COOKIE, cookie_header(&second_response));
    let request = SessionRequest::new(extract_request_cookies(&headers, &processor).unwrap());
    assert_eq!(overseer.get(&request).await.unwrap(), "user_id=42");
}
