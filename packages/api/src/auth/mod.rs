//! Server-side authentication: secret hashing, the credential-backed
//! [`SecretVerifier`](store::SecretVerifier) and the keys kept in the
//! `tower-sessions` session.

#[cfg(feature = "server")]
mod password;
#[cfg(feature = "server")]
mod session;
#[cfg(feature = "server")]
mod verifier;

#[cfg(feature = "server")]
pub use password::{hash_secret, verify_secret};
#[cfg(feature = "server")]
pub use session::{SessionData, SESSION_HOME_KEY, SESSION_UNIT_KEY, SESSION_USER_KEY};
#[cfg(feature = "server")]
pub use verifier::{set_credential, CredentialVerifier};
