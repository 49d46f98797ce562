use axum::{extract::Request, middleware::Next, response::IntoResponse, response::Response};

use crate::error::ApiError;
use crate::middleware::session::CurrentUser;

/// Routes a needs-reset user may still reach.
const EXEMPT_PATHS: [&str; 3] = ["/api/login", "/api/logout", "/api/reset-password"];

/// Global precondition, checked ahead of route-specific logic: a user whose
/// password reset is pending is sent to the reset flow everywhere else.
pub async fn require_password_reset(request: Request, next: Next) -> Response {
    let needs_reset = request
        .extensions()
        .get::<CurrentUser>()
        .and_then(|current| current.0.as_ref())
        .map(|user| user.needs_password_reset)
        .unwrap_or(false);

    if needs_reset && !EXEMPT_PATHS.contains(&request.uri().path()) {
        return ApiError::forbidden("Password reset required").into_response();
    }

    next.run(request).await
}
