use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::error::UserError;

/// JSON body accepted by `/register` and `/login`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Credentials with both fields present and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl CredentialsRequest {
    pub fn validate(self) -> Result<Credentials, UserError> {
        let username = self
            .username
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        // Passwords are taken verbatim.
        let password = self.password.filter(|p| !p.is_empty());

        match (username, password) {
            (Some(_), Some(password)) if !shelf_authz::is_supported(&password) => {
                Err(UserError::UnsupportedPassword)
            }
            (Some(username), Some(password)) => Ok(Credentials { username, password }),
            (username, password) => {
                let mut missing = Vec::new();
                if username.is_none() {
                    missing.push("username");
                }
                if password.is_none() {
                    missing.push("password");
                }
                Err(UserError::MissingFields(missing))
            }
        }
    }
}

/// Body of `GET /profile`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub username: String,
    /// Titles the user marked as favorites; not checked against the catalog
    pub favorite_books: Vec<String>,
}
