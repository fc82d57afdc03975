use async_trait::async_trait;

use crate::auth::errors::StoreError;
use crate::auth::models::Principal;
use crate::auth::models::UserId;
use crate::auth::models::UserRecord;

/// Read-only access to the persistent user table.
///
/// The store is an opaque external collaborator; each call is a single
/// parameterized lookup. `Ok(None)` means no such record, `Err` means the
/// lookup itself failed.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Exact-match lookup on the primary key.
    ///
    /// Used only to rehydrate the session principal from a stored session
    /// reference.
    ///
    /// # Errors
    /// * `Unavailable` - Store could not be reached
    /// * `MalformedRecord` - Row exists but could not be decoded
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserRecord>, StoreError>;

    /// Exact-match lookup on the unique email column.
    ///
    /// Used only during login.
    ///
    /// # Errors
    /// * `Unavailable` - Store could not be reached
    /// * `MalformedRecord` - Row exists but could not be decoded
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;
}

/// Resolves a session-stored user ID back into a principal.
///
/// The access gate depends on this interface rather than on the credential
/// store directly. Implementations mask store failures as absent, so a
/// deleted user and an unreachable store both degrade to anonymous.
#[async_trait]
pub trait PrincipalLoader: Send + Sync + 'static {
    async fn load(&self, id: &UserId) -> Option<Principal>;
}
