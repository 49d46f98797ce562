use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tower_sessions::Session;

use crate::auth::session::AuthSession;
use crate::database::users::{User, UserStore};
use crate::state::AppState;

/// The user resolved for this request, injected into request extensions as a
/// typed value. `None` is an anonymous request.
#[derive(Debug, Clone, Default)]
pub struct CurrentUser(pub Option<User>);

/// Re-derive the session's user snapshot from the store on every request.
/// `user_id` is the source of truth; a stale snapshot is never trusted across
/// the two diverging. When the id no longer resolves, both keys are stripped
/// and the session degrades to anonymous.
pub async fn resolve_user(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Response {
    let auth = AuthSession::new(session);
    let mut current = CurrentUser(None);

    match auth.user_id().await {
        Ok(Some(user_id)) => match state.users.find_by_id(user_id).await {
            Ok(Some(user)) => {
                if let Err(err) = auth.set_user(&user).await {
                    tracing::error!("failed to refresh session snapshot: {}", err);
                }
                current = CurrentUser(Some(user));
            }
            Ok(None) => {
                if let Err(err) = auth.clear_user().await {
                    tracing::error!("failed to strip dangling session user: {}", err);
                }
            }
            Err(err) => {
                // Transient store failure: this request runs anonymous, but the
                // keys stay so the next request can resolve again.
                tracing::error!("session user lookup failed: {}", err);
            }
        },
        Ok(None) => {}
        Err(err) => {
            tracing::error!("session read failed: {}", err);
        }
    }

    request.extensions_mut().insert(current);
    next.run(request).await
}
