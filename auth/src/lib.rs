//! Password hashing and verification utilities.
//!
//! Thin wrapper around Argon2id in PHC string format. The stored hash is
//! self-describing (algorithm, parameters, salt), so verification needs no
//! configuration beyond the hash itself.
//!
//! # Examples
//!
//! ```
//! use auth::PasswordVerifier;
//!
//! let verifier = PasswordVerifier::new();
//! let hash = verifier.hash("my_password").unwrap();
//! assert!(verifier.verify("my_password", &hash).unwrap());
//! assert!(!verifier.verify("not_my_password", &hash).unwrap());
//! ```

pub mod password;

pub use password::PasswordError;
pub use password::PasswordVerifier;
