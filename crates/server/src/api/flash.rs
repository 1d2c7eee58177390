//! Post/redirect/get helpers.
//!
//! Form handlers never render errors inline. They answer `303 See Other`
//! with the message carried in the query string of the page to go back to.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

/// `303` to `path?error=<message>`.
pub fn redirect_with_error(path: &str, message: &str) -> Response {
    see_other(&format!("{}?error={}", path, urlencoding::encode(message)))
}

/// `303` to `path?success=1`.
pub fn redirect_with_success(path: &str) -> Response {
    see_other(&format!("{}?success=1", path))
}

fn see_other(location: &str) -> Response {
    (StatusCode::SEE_OTHER, [(header::LOCATION, location.to_string())]).into_response()
}
