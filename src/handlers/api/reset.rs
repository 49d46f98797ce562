use axum::{extract::State, http::StatusCode, response::Json, Extension, Form};
use serde::Deserialize;
use serde_json::Value;
use tower_sessions::Session;

use crate::auth::session::AuthSession;
use crate::auth::workflow::{self, ResetInput};
use crate::error::ApiError;
use crate::handlers::api::auth_response;
use crate::middleware::session::CurrentUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ResetForm {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
    #[serde(default)]
    pub new_password2: String,
}

/// POST /api/reset-password - change the authenticated user's password and
/// clear the forced-reset flag, both in one store statement.
pub async fn reset_password(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    session: Session,
    Form(form): Form<ResetForm>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Some(user) = current.0 else {
        return Err(ApiError::unauthorized("Authentication required"));
    };

    workflow::reset_password(
        state.users.as_ref(),
        &user,
        ResetInput {
            current_password: form.current_password,
            new_password: form.new_password,
            new_password2: form.new_password2,
        },
    )
    .await?;

    // Clear the flag on the in-session snapshot as well, so the guard releases
    // without waiting for the next request's re-resolution.
    let mut updated = user;
    updated.needs_password_reset = false;

    let auth = AuthSession::new(session);
    auth.set_user(&updated).await?;
    auth.add_flash("Your password has been updated").await?;

    Ok(auth_response(StatusCode::OK, "Password updated"))
}
