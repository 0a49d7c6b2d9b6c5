//! Response constructors.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, CONTENT_TYPE, LOCATION, SET_COOKIE};
use hyper::StatusCode;
use serde::Serialize;

/// The response type every route returns.
pub type HttpResponse = hyper::Response<Full<Bytes>>;

fn with_body(status: StatusCode, content_type: &'static str, body: impl Into<Bytes>) -> HttpResponse {
    let mut response = hyper::Response::new(Full::new(body.into()));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

/// Creates a 200 response with HTML content.
pub fn html(body: String) -> HttpResponse {
    with_body(StatusCode::OK, "text/html; charset=utf-8", body)
}

/// Creates a response with JSON content.
pub fn json<T: Serialize>(status: StatusCode, data: &T) -> HttpResponse {
    match serde_json::to_vec(data) {
        Ok(body) => with_body(status, "application/json", body),
        Err(_) => internal_server_error(),
    }
}

/// Creates a response with plain text content.
pub fn text(status: StatusCode, body: &'static str) -> HttpResponse {
    with_body(status, "text/plain; charset=utf-8", body)
}

/// Creates a 303 redirect, so a reload does not repeat a POST.
pub fn see_other(location: &'static str) -> HttpResponse {
    let mut response = hyper::Response::new(Full::new(Bytes::new()));
    *response.status_mut() = StatusCode::SEE_OTHER;
    response
        .headers_mut()
        .insert(LOCATION, HeaderValue::from_static(location));
    response
}

/// Creates a 400 response carrying `{"error": message}`.
pub fn bad_request(message: &str) -> HttpResponse {
    json(
        StatusCode::BAD_REQUEST,
        &serde_json::json!({ "error": message }),
    )
}

/// Creates a 413 response carrying `{"error": message}`.
pub fn payload_too_large(message: &str) -> HttpResponse {
    json(
        StatusCode::PAYLOAD_TOO_LARGE,
        &serde_json::json!({ "error": message }),
    )
}

pub fn not_found() -> HttpResponse {
    text(StatusCode::NOT_FOUND, "Not Found")
}

pub fn method_not_allowed() -> HttpResponse {
    text(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}

pub fn internal_server_error() -> HttpResponse {
    text(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
}

/// Attaches the session cookie.
pub fn with_session_cookie(mut response: HttpResponse, cookie_name: &str, key: &str) -> HttpResponse {
    let cookie = format!("{cookie_name}={key}; Path=/; HttpOnly; SameSite=Lax");
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().append(SET_COOKIE, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_sets_content_type() {
        let response = json(StatusCode::OK, &serde_json::json!({ "message": null }));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn test_see_other() {
        let response = see_other("/");
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(LOCATION).unwrap(), "/");
    }

    #[test]
    fn test_session_cookie() {
        let response = with_session_cookie(html(String::new()), "enrol_session", "abc123");
        let cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.starts_with("enrol_session=abc123;"));
        assert!(cookie.contains("HttpOnly"));
    }
}
