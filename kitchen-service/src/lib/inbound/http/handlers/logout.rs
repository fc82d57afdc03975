use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::HeaderMap;
use axum::response::Response;
use axum::Extension;

use super::found_with_headers;
use crate::domain::auth::ports::UserStore;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::inbound::http::sessions;
use crate::inbound::http::sessions::Flash;

pub async fn logout<S>(
    State(state): State<AppState<S>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Response
where
    S: UserStore,
{
    state.sessions.revoke(&user.session_token);
    tracing::info!(user_id = %user.principal.id, "Session cleared");

    let mut headers = HeaderMap::new();
    headers.append(SET_COOKIE, sessions::clear_session_cookie());
    headers.append(SET_COOKIE, sessions::flash_cookie(Flash::LoggedOut));

    found_with_headers("/login", headers)
}
