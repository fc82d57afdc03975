use thiserror::Error;

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for credential store lookups.
///
/// Distinct from "record not found": a lookup that completes without a row
/// returns `Ok(None)`, while these variants mean the lookup itself failed.
/// Callers decide whether to surface the failure or mask it as absent.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Credential store unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed user record: {0}")]
    MalformedRecord(String),
}

/// Error for authentication attempts.
///
/// Unknown email, wrong password, and masked store failures all collapse
/// into the single `InvalidCredentials` variant so the user-visible outcome
/// cannot be used to enumerate accounts.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,
}
