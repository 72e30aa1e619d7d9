//! Credential hashing and session-based authorization guards.

pub mod password;
pub mod session;

pub use password::{is_supported, PasswordError, PasswordHasher, MAX_PASSWORD_BYTES};
pub use session::{AuthRejection, AuthSession, RequireUser, SessionError, LOGIN_PATH};
