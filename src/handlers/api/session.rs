use axum::{response::Json, Extension};
use serde_json::{json, Value};
use tower_sessions::Session;

use crate::auth::session::{AuthSession, SessionUser};
use crate::error::ApiError;
use crate::middleware::session::CurrentUser;

/// GET /api/session - the current user snapshot (password-free) plus any
/// queued flash messages. Reading the messages consumes them.
pub async fn session_info(
    Extension(current): Extension<CurrentUser>,
    session: Session,
) -> Result<Json<Value>, ApiError> {
    let auth = AuthSession::new(session);
    let messages = auth.take_flashes().await?;
    let user = current.0.as_ref().map(SessionUser::from);

    Ok(Json(json!({
        "data": {
            "user": user,
            "messages": messages,
        }
    })))
}
