use axum::{extract::State, http::StatusCode, response::Json, Form};
use serde::Deserialize;
use serde_json::Value;
use tower_sessions::Session;

use crate::auth::session::AuthSession;
use crate::auth::workflow;
use crate::error::ApiError;
use crate::handlers::api::auth_response;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// POST /api/login - authenticate and populate the session. A user with a
/// pending forced reset still logs in here; the guard steers every other
/// route to the reset flow until it completes.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let user = workflow::login(state.users.as_ref(), &form.username, &form.password).await?;

    let auth = AuthSession::new(session);
    auth.login(&user).await?;
    auth.add_flash("You were logged in").await?;
    if user.needs_password_reset {
        auth.add_flash("You must change your password before continuing")
            .await?;
    }

    Ok(auth_response(StatusCode::OK, "Login successful"))
}
