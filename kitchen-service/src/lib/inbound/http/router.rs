use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::HeaderMap;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::index::index;
use super::handlers::kitchen::kitchen;
use super::handlers::login::show_login_form;
use super::handlers::login::submit_login;
use super::handlers::logout::logout;
use super::middleware::require_login;
use super::sessions::SessionStore;
use crate::domain::auth::ports::PrincipalLoader;
use crate::domain::auth::ports::UserStore;
use crate::domain::auth::service::AuthService;
use crate::domain::auth::Principal;

/// Server context constructed once at startup and injected into handlers.
pub struct AppState<S>
where
    S: UserStore,
{
    pub auth_service: Arc<AuthService<S>>,
    pub sessions: Arc<SessionStore>,
}

// Manual impl: deriving Clone would require S: Clone, which the Arcs make
// unnecessary.
impl<S> Clone for AppState<S>
where
    S: UserStore,
{
    fn clone(&self) -> Self {
        Self {
            auth_service: Arc::clone(&self.auth_service),
            sessions: Arc::clone(&self.sessions),
        }
    }
}

impl<S> AppState<S>
where
    S: UserStore,
{
    /// Resolve the request's session cookie into a live principal.
    ///
    /// Consults the store on every call; a session whose backing record has
    /// been removed is revoked and treated as anonymous.
    pub async fn current_session(&self, headers: &HeaderMap) -> Option<(String, Principal)> {
        let token = self.sessions.token_from_headers(headers)?;
        let user_id = self.sessions.resolve(&token)?;

        match self.auth_service.load(&user_id).await {
            Some(principal) => Some((token, principal)),
            None => {
                tracing::info!(user_id = %user_id, "Session references a missing user, revoking");
                self.sessions.revoke(&token);
                None
            }
        }
    }
}

pub fn create_router<S>(auth_service: Arc<AuthService<S>>, sessions: Arc<SessionStore>) -> Router
where
    S: UserStore,
{
    let state = AppState {
        auth_service,
        sessions,
    };

    let public_routes = Router::new()
        .route("/", get(index))
        .route("/login", get(show_login_form::<S>).post(submit_login::<S>));

    let protected_routes = Router::new()
        .route("/kitchen", get(kitchen))
        .route("/logout", get(logout::<S>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_login::<S>,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .with_state(state)
}
