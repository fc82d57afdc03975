use axum::http::header::SET_COOKIE;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::response::Html;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Extension;

use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::sessions;
use crate::inbound::http::sessions::Flash;
use crate::inbound::http::views;

pub async fn kitchen(
    Extension(user): Extension<AuthenticatedUser>,
    request_headers: HeaderMap,
) -> Response {
    let flash = sessions::pending_flash(&request_headers);
    let body = views::kitchen_page(user.principal.email.as_str(), flash.map(Flash::message));

    let mut headers = HeaderMap::new();
    if flash.is_some() {
        headers.append(SET_COOKIE, sessions::clear_flash_cookie());
    }

    (StatusCode::OK, headers, Html(body)).into_response()
}
