use axum::extract::Request;
use axum::extract::State;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::auth::ports::UserStore;
use crate::domain::auth::Principal;
use crate::inbound::http::handlers::found;
use crate::inbound::http::router::AppState;

/// Extension type carrying the authenticated identity through a protected
/// request, plus the session token it was rehydrated from.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub session_token: String,
    pub principal: Principal,
}

/// Access gate for protected routes.
///
/// Anonymous requests are redirected to the login page with the requested
/// path preserved as the `next` destination. Authenticated requests get the
/// principal rehydrated from the store and attached to request extensions.
pub async fn require_login<S>(
    State(state): State<AppState<S>>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response>
where
    S: UserStore,
{
    let Some((session_token, principal)) = state.current_session(req.headers()).await else {
        let requested = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or_else(|| req.uri().path());
        let destination = format!("/login?next={}", urlencoding::encode(requested));
        return Err(found(&destination));
    };

    req.extensions_mut().insert(AuthenticatedUser {
        session_token,
        principal,
    });

    Ok(next.run(req).await)
}
