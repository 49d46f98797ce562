//! The register / login / reset-password transitions. Each transition makes
//! one store round trip for its primary check and at most one more for its
//! mutation; session writes belong to the HTTP layer.

use thiserror::Error;

use crate::auth::password;
use crate::database::users::{DuplicateField, NewUser, StoreError, User, UserStore};

#[derive(Debug, Error)]
pub enum AuthError {
    /// Missing form fields. Surfaced to the caller field-first, never logged
    /// as severe.
    #[error("{0}")]
    Validation(&'static str),

    #[error("{0}")]
    PasswordMismatch(&'static str),

    /// Unknown user and wrong password share this variant and its message, so
    /// a caller can't probe which usernames exist.
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("{}", .0.message())]
    Duplicate(DuplicateField),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(field) => AuthError::Duplicate(field),
            other => AuthError::Store(other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password2: String,
}

/// Register a new user. Never logs the user in; the caller queues the
/// "you can login now" flash.
pub async fn register(store: &dyn UserStore, input: RegisterInput) -> Result<(), AuthError> {
    if input.username.is_empty()
        || input.email.is_empty()
        || input.password.is_empty()
        || input.password2.is_empty()
    {
        return Err(AuthError::Validation("All fields are required"));
    }
    if input.password != input.password2 {
        return Err(AuthError::PasswordMismatch("The two passwords do not match"));
    }

    // The unique constraints are authoritative for collisions; no pre-check,
    // so registration stays at a single mutating round trip.
    store
        .create(NewUser {
            username: input.username,
            email: input.email,
            password: input.password,
        })
        .await?;
    Ok(())
}

/// Authenticate a user. On success the caller decides between the plain
/// authenticated state and the forced-reset state from the returned user's
/// flag.
pub async fn login(
    store: &dyn UserStore,
    username: &str,
    password_input: &str,
) -> Result<User, AuthError> {
    if username.is_empty() || password_input.is_empty() {
        return Err(AuthError::Validation("Username and password are required"));
    }

    let user = store
        .find_by_username(username)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    let verified = password::verify_password(password_input, &user.password)
        .map_err(|e| AuthError::Store(StoreError::Hash(e)))?;
    if !verified {
        return Err(AuthError::InvalidCredentials);
    }

    Ok(user)
}

#[derive(Debug, Clone)]
pub struct ResetInput {
    pub current_password: String,
    pub new_password: String,
    pub new_password2: String,
}

/// Change the password of an authenticated user. The store clears the
/// forced-reset flag in the same statement as the hash update.
pub async fn reset_password(
    store: &dyn UserStore,
    user: &User,
    input: ResetInput,
) -> Result<(), AuthError> {
    if input.current_password.is_empty()
        || input.new_password.is_empty()
        || input.new_password2.is_empty()
    {
        return Err(AuthError::Validation("All fields are required"));
    }

    let verified = password::verify_password(&input.current_password, &user.password)
        .map_err(|e| AuthError::Store(StoreError::Hash(e)))?;
    if !verified {
        return Err(AuthError::InvalidCredentials);
    }

    if input.new_password != input.new_password2 {
        return Err(AuthError::PasswordMismatch("The two passwords do not match"));
    }
    if input.new_password == input.current_password {
        return Err(AuthError::PasswordMismatch(
            "New password must differ from the current password",
        ));
    }

    store.update_password(user.id, &input.new_password).await?;
    Ok(())
}
