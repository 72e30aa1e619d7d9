use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use shelf_authz::{AuthSession, RequireUser, LOGIN_PATH};
use shelf_http::error::{ErrorBody, MessageBody};

use super::error::UserError;
use super::models::{Credentials, CredentialsRequest, ProfileResponse};
use super::UsersState;

/// Create an account with a bcrypt-hashed password.
#[utoipa::path(
    post,
    path = "/register",
    tag = "Users",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Account created", body = MessageBody),
        (status = 400, description = "Malformed body, missing fields, or username taken", body = ErrorBody)
    )
)]
pub async fn register(
    State(state): State<UsersState>,
    body: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageBody>), UserError> {
    let Json(request) = body.map_err(UserError::MalformedBody)?;
    let Credentials { username, password } = request.validate()?;

    tracing::info!(%username, "user registration attempt");

    if state.store.find_user_by_username(&username).await?.is_some() {
        tracing::warn!(%username, "registration rejected: username exists");
        return Err(UserError::UsernameTaken);
    }

    let password_hash = state.hasher.hash(&password).await?;
    // A concurrent registration can still win here; the store rejects the duplicate.
    let user = state.store.insert_user(&username, &password_hash).await?;

    tracing::info!(user_id = %user.id, %username, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(MessageBody::new("User registered successfully")),
    ))
}

/// Verify credentials and bind the user to the session.
#[utoipa::path(
    post,
    path = "/login",
    tag = "Users",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Session established", body = MessageBody),
        (status = 400, description = "Malformed body or missing fields", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody)
    )
)]
pub async fn login(
    State(state): State<UsersState>,
    mut auth: AuthSession,
    body: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<MessageBody>, UserError> {
    let Json(request) = body.map_err(UserError::MalformedBody)?;
    let Credentials { username, password } = request.validate()?;

    let Some(user) = state.store.find_user_by_username(&username).await? else {
        tracing::warn!(%username, "login failed: unknown user");
        return Err(UserError::InvalidCredentials);
    };

    if !state.hasher.verify(&password, &user.password).await? {
        tracing::warn!(%username, "login failed: wrong password");
        return Err(UserError::InvalidCredentials);
    }

    auth.login(&user.id).await?;

    tracing::info!(user_id = %user.id, %username, "login successful");
    Ok(Json(MessageBody::new("Logged in successfully")))
}

/// End the current session.
#[utoipa::path(
    post,
    path = "/logout",
    tag = "Users",
    responses(
        (status = 200, description = "Session cleared", body = MessageBody),
        (status = 303, description = "No session; redirected to the login route")
    )
)]
pub async fn logout(user: RequireUser) -> Result<Json<MessageBody>, UserError> {
    let mut session = user.session;
    session.logout().await?;

    tracing::info!(user_id = %user.user_id, "logged out");
    Ok(Json(MessageBody::new("Logged out successfully")))
}

/// Show the logged-in user's favorite books.
#[utoipa::path(
    get,
    path = "/profile",
    tag = "Users",
    responses(
        (status = 200, description = "Profile of the session user", body = ProfileResponse),
        (status = 303, description = "No session; redirected to the login route")
    )
)]
pub async fn profile(
    State(state): State<UsersState>,
    user: RequireUser,
) -> Result<Response, UserError> {
    match state.store.find_user_by_id(&user.user_id).await? {
        Some(account) => Ok(Json(ProfileResponse {
            username: account.username,
            favorite_books: account.favorite_books,
        })
        .into_response()),
        None => {
            tracing::warn!(user_id = %user.user_id, "session refers to a missing user");
            let mut session = user.session;
            session.logout().await?;
            Ok(Redirect::to(LOGIN_PATH).into_response())
        }
    }
}
