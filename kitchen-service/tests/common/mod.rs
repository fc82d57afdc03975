use std::collections::HashMap;
use std::sync::Arc;
use std::sync::RwLock;

use async_trait::async_trait;
use auth::PasswordVerifier;
use chrono::Utc;
use kitchen_service::domain::auth::errors::StoreError;
use kitchen_service::domain::auth::models::EmailAddress;
use kitchen_service::domain::auth::models::UserId;
use kitchen_service::domain::auth::models::UserRecord;
use kitchen_service::domain::auth::ports::UserStore;
use kitchen_service::domain::auth::service::AuthService;
use kitchen_service::inbound::http::router::create_router;
use kitchen_service::inbound::http::sessions::SessionStore;

/// In-memory user store so HTTP tests run without a database.
///
/// Records are seeded per test; removing one mid-test simulates a user
/// deleted while their session is still live.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<UserId, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn add_user(&self, email: &str, password: &str) -> UserId {
        let record = UserRecord {
            id: UserId::new(),
            email: EmailAddress::new(email.to_string()).expect("test email is well-formed"),
            password_hash: PasswordVerifier::new()
                .hash(password)
                .expect("test password hashes"),
            created_at: Utc::now(),
        };
        let id = record.id;
        self.users.write().unwrap().insert(id, record);
        id
    }

    pub fn remove_user(&self, id: &UserId) {
        self.users.write().unwrap().remove(id);
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.users.read().unwrap().get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self
            .users
            .read()
            .unwrap()
            .values()
            .find(|record| record.email.as_str() == email)
            .cloned())
    }
}

/// Test application that spawns a real server on a random port.
pub struct TestApp {
    pub address: String,
    pub store: Arc<InMemoryUserStore>,
    pub api_client: reqwest::Client,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let store = Arc::new(InMemoryUserStore::default());
        let auth_service = Arc::new(AuthService::new(Arc::clone(&store)));
        let sessions = Arc::new(SessionStore::new(b"test-session-secret-at-least-32-bytes!"));

        let app = create_router(auth_service, sessions);
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server failed");
        });

        // Redirects stay visible to assertions; cookies persist across
        // requests like a browser.
        let api_client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .cookie_store(true)
            .build()
            .expect("Failed to build test client");

        Self {
            address,
            store,
            api_client,
        }
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    pub async fn login(&self, path: &str, email: &str, password: &str) -> reqwest::Response {
        self.api_client
            .post(format!("{}{}", self.address, path))
            .form(&[("email", email), ("password", password)])
            .send()
            .await
            .expect("Failed to execute request")
    }
}

pub fn location(response: &reqwest::Response) -> &str {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .expect("Response has no Location header")
        .to_str()
        .expect("Location header is not ASCII")
}
