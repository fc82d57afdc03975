use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordVerifier;

use crate::auth::errors::AuthError;
use crate::auth::models::EmailAddress;
use crate::auth::models::Principal;
use crate::auth::models::UserId;
use crate::auth::ports::PrincipalLoader;
use crate::auth::ports::UserStore;

/// Credential verification and principal loading over a user store.
///
/// Store failures are logged and masked as "no such user" on both paths, so
/// a caller never observes the difference between an unknown account and an
/// unreachable store.
pub struct AuthService<S>
where
    S: UserStore,
{
    store: Arc<S>,
    verifier: PasswordVerifier,
}

impl<S> AuthService<S>
where
    S: UserStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            verifier: PasswordVerifier::new(),
        }
    }

    /// Verify a submitted email/password pair against the store.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email, wrong password, or a masked
    ///   lookup failure; the variant is identical for all three causes
    pub async fn authenticate(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<Principal, AuthError> {
        let record = match self.store.find_by_email(email.as_str()).await {
            Ok(Some(record)) => record,
            Ok(None) => return Err(AuthError::InvalidCredentials),
            Err(e) => {
                tracing::warn!(error = %e, "User lookup failed during login, treating as unknown email");
                return Err(AuthError::InvalidCredentials);
            }
        };

        match self.verifier.verify(password, &record.password_hash) {
            Ok(true) => {
                tracing::info!(user_id = %record.id, "Login verified");
                Ok(Principal::from(&record))
            }
            Ok(false) => Err(AuthError::InvalidCredentials),
            Err(e) => {
                tracing::error!(user_id = %record.id, error = %e, "Stored password hash could not be verified");
                Err(AuthError::InvalidCredentials)
            }
        }
    }
}

#[async_trait]
impl<S> PrincipalLoader for AuthService<S>
where
    S: UserStore,
{
    async fn load(&self, id: &UserId) -> Option<Principal> {
        match self.store.find_by_id(id).await {
            Ok(Some(record)) => Some(Principal::from(&record)),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(user_id = %id, error = %e, "User lookup failed during session rehydration, treating as absent");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use mockall::mock;
    use mockall::predicate::*;

    use super::*;
    use crate::auth::errors::StoreError;
    use crate::auth::models::UserRecord;

    mock! {
        pub TestUserStore {}

        #[async_trait]
        impl UserStore for TestUserStore {
            async fn find_by_id(&self, id: &UserId) -> Result<Option<UserRecord>, StoreError>;
            async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;
        }
    }

    fn record_with_password(email: &str, password: &str) -> UserRecord {
        let hash = PasswordVerifier::new().hash(password).unwrap();
        UserRecord {
            id: UserId::new(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            password_hash: hash,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let mut store = MockTestUserStore::new();

        let record = record_with_password("alice@example.com", "correct");
        let expected_id = record.id;
        store
            .expect_find_by_email()
            .withf(|email| email == "alice@example.com")
            .times(1)
            .returning(move |_| Ok(Some(record.clone())));

        let service = AuthService::new(Arc::new(store));

        let email = EmailAddress::new("alice@example.com".to_string()).unwrap();
        let principal = service.authenticate(&email, "correct").await.unwrap();

        assert_eq!(principal.id, expected_id);
        assert_eq!(principal.email.as_str(), "alice@example.com");
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password() {
        let mut store = MockTestUserStore::new();

        let record = record_with_password("alice@example.com", "correct");
        store
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(record.clone())));

        let service = AuthService::new(Arc::new(store));

        let email = EmailAddress::new("alice@example.com".to_string()).unwrap();
        let result = service.authenticate(&email, "wrong").await;

        assert_eq!(result.unwrap_err(), AuthError::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_authenticate_unknown_email_yields_same_error() {
        let mut store = MockTestUserStore::new();

        store
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));

        let service = AuthService::new(Arc::new(store));

        let email = EmailAddress::new("nobody@example.com".to_string()).unwrap();
        let unknown_email = service.authenticate(&email, "whatever").await.unwrap_err();

        // Identical to the wrong-password failure, so responses cannot be
        // used to enumerate accounts.
        assert_eq!(unknown_email, AuthError::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_authenticate_masks_store_failure() {
        let mut store = MockTestUserStore::new();

        store
            .expect_find_by_email()
            .times(1)
            .returning(|_| Err(StoreError::Unavailable("connection refused".to_string())));

        let service = AuthService::new(Arc::new(store));

        let email = EmailAddress::new("alice@example.com".to_string()).unwrap();
        let result = service.authenticate(&email, "correct").await;

        assert_eq!(result.unwrap_err(), AuthError::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_authenticate_masks_malformed_hash() {
        let mut store = MockTestUserStore::new();

        let record = UserRecord {
            id: UserId::new(),
            email: EmailAddress::new("alice@example.com".to_string()).unwrap(),
            password_hash: "not-a-phc-string".to_string(),
            created_at: Utc::now(),
        };
        store
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(record.clone())));

        let service = AuthService::new(Arc::new(store));

        let email = EmailAddress::new("alice@example.com".to_string()).unwrap();
        let result = service.authenticate(&email, "correct").await;

        assert_eq!(result.unwrap_err(), AuthError::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_load_success() {
        let mut store = MockTestUserStore::new();

        let record = record_with_password("alice@example.com", "correct");
        let user_id = record.id;
        store
            .expect_find_by_id()
            .withf(move |id| *id == user_id)
            .times(1)
            .returning(move |_| Ok(Some(record.clone())));

        let service = AuthService::new(Arc::new(store));

        let principal = service.load(&user_id).await.unwrap();
        assert_eq!(principal.id, user_id);
    }

    #[tokio::test]
    async fn test_load_deleted_user_is_absent() {
        let mut store = MockTestUserStore::new();

        store.expect_find_by_id().times(1).returning(|_| Ok(None));

        let service = AuthService::new(Arc::new(store));

        assert!(service.load(&UserId::new()).await.is_none());
    }

    #[tokio::test]
    async fn test_load_masks_store_failure() {
        let mut store = MockTestUserStore::new();

        store
            .expect_find_by_id()
            .times(1)
            .returning(|_| Err(StoreError::Unavailable("connection refused".to_string())));

        let service = AuthService::new(Arc::new(store));

        assert!(service.load(&UserId::new()).await.is_none());
    }
}
