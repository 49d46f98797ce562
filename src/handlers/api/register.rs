use axum::{extract::State, http::StatusCode, response::Json, Form};
use serde::Deserialize;
use serde_json::Value;
use tower_sessions::Session;

use crate::auth::session::AuthSession;
use crate::auth::workflow::{self, RegisterInput};
use crate::error::ApiError;
use crate::handlers::api::auth_response;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password2: String,
}

/// POST /api/register - create an account. Registration never logs the user
/// in; a flash points them at the login flow instead.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    workflow::register(
        state.users.as_ref(),
        RegisterInput {
            username: form.username,
            email: form.email,
            password: form.password,
            password2: form.password2,
        },
    )
    .await?;

    let auth = AuthSession::new(session);
    auth.add_flash("You were successfully registered and can login now")
        .await?;

    Ok(auth_response(
        StatusCode::CREATED,
        "User registered successfully",
    ))
}
