//! Session-backed authentication state.
//!
//! A request is either anonymous or carries the id of the user that logged in
//! on this session. [`AuthSession`] exposes that state to any handler;
//! [`RequireUser`] rejects anonymous requests with a redirect to the login route.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use shelf_http::error::AppError;
use thiserror::Error;
use tower_sessions::Session;

/// Session key holding the authenticated user's id.
pub const SESSION_USER_ID_KEY: &str = "user_id";

/// Where unauthenticated requests to guarded routes are sent.
pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Error)]
#[error("session store failure: {0}")]
pub struct SessionError(#[from] tower_sessions::session::Error);

/// Request-scoped authentication context.
#[derive(Debug, Clone)]
pub struct AuthSession {
    session: Session,
    user_id: Option<String>,
}

impl AuthSession {
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    /// Anonymous -> Authenticated. Issues a fresh session id before storing the user.
    pub async fn login(&mut self, user_id: &str) -> Result<(), SessionError> {
        self.session.cycle_id().await?;
        self.session.insert(SESSION_USER_ID_KEY, user_id).await?;
        self.user_id = Some(user_id.to_owned());
        Ok(())
    }

    /// Authenticated -> Anonymous. Drops all session data.
    pub async fn logout(&mut self) -> Result<(), SessionError> {
        self.session.flush().await?;
        self.user_id = None;
        Ok(())
    }
}

impl<S> FromRequestParts<S> for AuthSession
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        let user_id = session
            .get::<String>(SESSION_USER_ID_KEY)
            .await
            .map_err(|err| {
                AppError::Internal(SessionError(err).into()).into_response()
            })?;

        Ok(Self { session, user_id })
    }
}

/// Extractor for routes that only authenticated sessions may use.
#[derive(Debug, Clone)]
pub struct RequireUser {
    pub user_id: String,
    pub session: AuthSession,
}

/// Why a guarded route refused the request.
#[derive(Debug)]
pub enum AuthRejection {
    LoginRequired,
    Session(Response),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            AuthRejection::LoginRequired => Redirect::to(LOGIN_PATH).into_response(),
            AuthRejection::Session(response) => response,
        }
    }
}

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = AuthSession::from_request_parts(parts, state)
            .await
            .map_err(AuthRejection::Session)?;

        match session.user_id.clone() {
            Some(user_id) => Ok(Self { user_id, session }),
            None => {
                tracing::debug!(path = %parts.uri.path(), "anonymous request to guarded route");
                Err(AuthRejection::LoginRequired)
            }
        }
    }
}
