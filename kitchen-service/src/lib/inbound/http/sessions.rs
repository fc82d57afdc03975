use std::collections::HashMap;
use std::sync::RwLock;

use axum::http::HeaderMap;
use axum::http::HeaderValue;
use hmac::Hmac;
use hmac::Mac;
use sha2::Sha256;
use uuid::Uuid;

use crate::auth::models::UserId;

/// Name of the session cookie holding the signed session token.
pub const SESSION_COOKIE: &str = "kitchen_session";

/// Name of the one-shot flash cookie; cleared on the next page render.
const FLASH_COOKIE: &str = "kitchen_flash";

type HmacSha256 = Hmac<Sha256>;

/// One-shot notices carried across a redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    LoggedIn,
    LoggedOut,
}

impl Flash {
    pub fn message(self) -> &'static str {
        match self {
            Flash::LoggedIn => "Logged in successfully.",
            Flash::LoggedOut => "Logged out successfully.",
        }
    }

    fn code(self) -> &'static str {
        match self {
            Flash::LoggedIn => "logged_in",
            Flash::LoggedOut => "logged_out",
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        match code {
            "logged_in" => Some(Flash::LoggedIn),
            "logged_out" => Some(Flash::LoggedOut),
            _ => None,
        }
    }
}

/// Server-side session state, keyed by an opaque random token.
///
/// The cookie carries `<token>.<hmac-sha256(secret, token)>`; the map only
/// ever holds the user ID, so the principal is rehydrated from the store on
/// every protected request. One instance lives in the app state; sessions do
/// not survive a process restart and are not shared across processes.
pub struct SessionStore {
    secret: Vec<u8>,
    sessions: RwLock<HashMap<String, UserId>>,
}

impl SessionStore {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            secret: secret.to_vec(),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Create a session for a user and return the opaque token.
    pub fn issue(&self, user_id: UserId) -> String {
        let token = Uuid::new_v4().simple().to_string();
        self.sessions
            .write()
            .expect("session map lock poisoned")
            .insert(token.clone(), user_id);
        token
    }

    /// Resolve a token back to the user ID it was issued for.
    pub fn resolve(&self, token: &str) -> Option<UserId> {
        self.sessions
            .read()
            .expect("session map lock poisoned")
            .get(token)
            .copied()
    }

    /// Remove a session; subsequent resolves of the token return `None`.
    pub fn revoke(&self, token: &str) {
        self.sessions
            .write()
            .expect("session map lock poisoned")
            .remove(token);
    }

    /// Extract and authenticate the session token from request headers.
    ///
    /// A missing cookie, a cookie without a MAC, or a MAC that does not
    /// verify all yield `None`.
    pub fn token_from_headers(&self, headers: &HeaderMap) -> Option<String> {
        let value = parse_cookie(headers, SESSION_COOKIE)?;
        let (token, mac_hex) = value.split_once('.')?;

        let mac_bytes = hex::decode(mac_hex).ok()?;
        let mut mac = HmacSha256::new_from_slice(&self.secret).ok()?;
        mac.update(token.as_bytes());
        mac.verify_slice(&mac_bytes).ok()?;

        Some(token.to_string())
    }

    /// `Set-Cookie` value establishing the signed session cookie.
    pub fn session_cookie(&self, token: &str) -> HeaderValue {
        let value = format!("{}.{}", token, self.sign(token));
        HeaderValue::from_str(&format!(
            "{}={}; HttpOnly; SameSite=Lax; Path=/",
            SESSION_COOKIE, value
        ))
        .expect("session cookie value is ASCII")
    }

    fn sign(&self, token: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .expect("HMAC accepts keys of any length");
        mac.update(token.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

/// `Set-Cookie` value expiring the session cookie.
pub fn clear_session_cookie() -> HeaderValue {
    HeaderValue::from_str(&format!(
        "{}=deleted; Expires=Thu, 01 Jan 1970 00:00:00 GMT; HttpOnly; SameSite=Lax; Path=/",
        SESSION_COOKIE
    ))
    .expect("cookie value is ASCII")
}

/// `Set-Cookie` value carrying a flash notice to the next render.
pub fn flash_cookie(flash: Flash) -> HeaderValue {
    HeaderValue::from_str(&format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/",
        FLASH_COOKIE,
        flash.code()
    ))
    .expect("cookie value is ASCII")
}

/// `Set-Cookie` value clearing the flash notice.
pub fn clear_flash_cookie() -> HeaderValue {
    HeaderValue::from_str(&format!(
        "{}=deleted; Expires=Thu, 01 Jan 1970 00:00:00 GMT; HttpOnly; SameSite=Lax; Path=/",
        FLASH_COOKIE
    ))
    .expect("cookie value is ASCII")
}

/// Read the pending flash notice, if any.
pub fn pending_flash(headers: &HeaderMap) -> Option<Flash> {
    parse_cookie(headers, FLASH_COOKIE).and_then(|code| Flash::from_code(&code))
}

fn parse_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookie = headers.get(axum::http::header::COOKIE)?;
    let s = cookie.to_str().ok()?;
    for part in s.split(';') {
        let p = part.trim();
        if let Some((k, v)) = p.split_once('=') {
            if k == name {
                return Some(v.to_string());
            }
        }
    }
    None
}
