use axum::http::header::LOCATION;
use axum::http::HeaderMap;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;

pub mod index;
pub mod kitchen;
pub mod login;
pub mod logout;

/// 302 Found redirect.
///
/// `axum::response::Redirect` issues 303/307; the classic post-login and
/// gate redirects are 302, so responses are built directly.
pub fn found(location: &str) -> Response {
    found_with_headers(location, HeaderMap::new())
}

/// 302 Found redirect carrying extra headers (cookies).
///
/// A target that is not a valid header value degrades to the site root
/// rather than failing the response.
pub fn found_with_headers(location: &str, mut headers: HeaderMap) -> Response {
    let location = HeaderValue::from_str(location).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Redirect target is not a valid header value, falling back to /");
        HeaderValue::from_static("/")
    });
    headers.insert(LOCATION, location);
    (StatusCode::FOUND, headers).into_response()
}
