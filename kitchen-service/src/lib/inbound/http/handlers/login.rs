use axum::extract::Query;
use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::response::Html;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Form;
use serde::Deserialize;

use super::found;
use super::found_with_headers;
use crate::domain::auth::models::EmailAddress;
use crate::domain::auth::ports::UserStore;
use crate::inbound::http::router::AppState;
use crate::inbound::http::sessions;
use crate::inbound::http::sessions::Flash;
use crate::inbound::http::views;
use crate::inbound::http::views::LoginFieldErrors;

/// Default destination after a successful login.
const DEFAULT_NEXT: &str = "/kitchen";

#[derive(Debug, Clone, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

pub async fn show_login_form<S>(
    State(state): State<AppState<S>>,
    Query(query): Query<NextQuery>,
    headers: HeaderMap,
) -> Response
where
    S: UserStore,
{
    // A logged-in user revisiting the login page is bounced onward.
    if state.current_session(&headers).await.is_some() {
        return found(DEFAULT_NEXT);
    }

    render_form(
        &headers,
        None,
        LoginFieldErrors::default(),
        "",
        query.next.as_deref(),
    )
}

pub async fn submit_login<S>(
    State(state): State<AppState<S>>,
    Query(query): Query<NextQuery>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Response
where
    S: UserStore,
{
    if state.current_session(&headers).await.is_some() {
        return found(DEFAULT_NEXT);
    }

    let next = query.next.as_deref();

    // Shape validation; field-level errors redisplay the form.
    let mut field_errors = LoginFieldErrors::default();
    if form.password.is_empty() {
        field_errors.password = Some("Password is required.");
    }
    let email = if form.email.is_empty() {
        field_errors.email = Some("Email is required.");
        None
    } else {
        match EmailAddress::new(form.email.clone()) {
            Ok(email) => Some(email),
            Err(_) => {
                field_errors.email = Some("Enter a valid email address.");
                None
            }
        }
    };

    let email = match (email, field_errors.any()) {
        (Some(email), false) => email,
        _ => return render_form(&headers, None, field_errors, &form.email, next),
    };

    match state.auth_service.authenticate(&email, &form.password).await {
        Ok(principal) => {
            let token = state.sessions.issue(principal.id);
            tracing::info!(user_id = %principal.id, "Session established");

            let mut response_headers = HeaderMap::new();
            response_headers.append(SET_COOKIE, state.sessions.session_cookie(&token));
            response_headers.append(SET_COOKIE, sessions::flash_cookie(Flash::LoggedIn));

            found_with_headers(&sanitize_next(next), response_headers)
        }
        Err(_) => {
            // One generic message for unknown email and wrong password alike.
            render_form(
                &headers,
                Some("Invalid email or password."),
                LoginFieldErrors::default(),
                &form.email,
                next,
            )
        }
    }
}

/// Only same-site paths are honored as a post-login destination.
///
/// The value arrives percent-decoded from the query string, so it must also
/// be safe to emit verbatim in a Location header: anything containing
/// whitespace, control bytes, or non-ASCII falls back to the default.
fn sanitize_next(next: Option<&str>) -> String {
    match next {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && path.bytes().all(|b| b.is_ascii_graphic()) =>
        {
            path.to_string()
        }
        _ => DEFAULT_NEXT.to_string(),
    }
}

fn render_form(
    request_headers: &HeaderMap,
    error: Option<&str>,
    field_errors: LoginFieldErrors,
    email_value: &str,
    next: Option<&str>,
) -> Response {
    let flash = sessions::pending_flash(request_headers);
    let body = views::login_page(
        error,
        flash.map(Flash::message),
        field_errors,
        email_value,
        next,
    );

    let mut headers = HeaderMap::new();
    if flash.is_some() {
        headers.append(SET_COOKIE, sessions::clear_flash_cookie());
    }

    (StatusCode::OK, headers, Html(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_next_keeps_local_paths() {
        assert_eq!(sanitize_next(Some("/kitchen")), "/kitchen");
        assert_eq!(sanitize_next(Some("/somewhere/else")), "/somewhere/else");
    }

    #[test]
    fn test_sanitize_next_rejects_external_targets() {
        assert_eq!(sanitize_next(Some("https://evil.example")), DEFAULT_NEXT);
        assert_eq!(sanitize_next(Some("//evil.example")), DEFAULT_NEXT);
        assert_eq!(sanitize_next(None), DEFAULT_NEXT);
    }

    #[test]
    fn test_sanitize_next_rejects_header_unsafe_bytes() {
        assert_eq!(sanitize_next(Some("/a\r\nX: y")), DEFAULT_NEXT);
        assert_eq!(sanitize_next(Some("/a b")), DEFAULT_NEXT);
        assert_eq!(sanitize_next(Some("/caf\u{e9}")), DEFAULT_NEXT);
    }
}
