use axum::{http::StatusCode, response::Json};
use serde_json::Value;
use tower_sessions::Session;

use crate::auth::session::AuthSession;
use crate::error::ApiError;
use crate::handlers::api::auth_response;

/// GET /api/logout - drop every session key and invalidate the old session
/// id. The farewell flash rides the replacement anonymous session.
pub async fn logout(session: Session) -> Result<(StatusCode, Json<Value>), ApiError> {
    let auth = AuthSession::new(session);
    auth.logout().await?;
    auth.add_flash("You have been successfully logged out")
        .await?;

    Ok(auth_response(StatusCode::OK, "Logout successful"))
}
