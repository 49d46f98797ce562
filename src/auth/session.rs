//! Typed access to the cookie-referenced session: the authenticated user
//! keys, and the consumed-once flash queue.

use serde::{Deserialize, Serialize};
use tower_sessions::{session::Error as SessionError, Session};

use crate::database::users::User;

pub const USER_KEY: &str = "user";
pub const USER_ID_KEY: &str = "user_id";
const FLASH_KEY: &str = "_flash";

/// Denormalized user snapshot carried in the session. `user_id` stays the
/// source of truth; this is re-derived from the store on every request and
/// never includes the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub needs_password_reset: bool,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            needs_password_reset: user.needs_password_reset,
        }
    }
}

/// Wrapper over the raw session so handlers never touch string keys or
/// loosely-typed values directly.
pub struct AuthSession {
    session: Session,
}

impl AuthSession {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub async fn user_id(&self) -> Result<Option<i32>, SessionError> {
        self.session.get::<i32>(USER_ID_KEY).await
    }

    pub async fn user(&self) -> Result<Option<SessionUser>, SessionError> {
        self.session.get::<SessionUser>(USER_KEY).await
    }

    /// Populate the session at successful login. The id is cycled so a
    /// pre-login cookie can't be replayed into an authenticated one.
    pub async fn login(&self, user: &User) -> Result<(), SessionError> {
        self.session.insert(USER_ID_KEY, user.id).await?;
        self.session.insert(USER_KEY, SessionUser::from(user)).await?;
        self.session.cycle_id().await
    }

    /// Refresh the denormalized snapshot from a freshly resolved user.
    pub async fn set_user(&self, user: &User) -> Result<(), SessionError> {
        self.session.insert(USER_KEY, SessionUser::from(user)).await
    }

    /// Strip both user keys. Used when `user_id` no longer resolves, so the
    /// session degrades to anonymous instead of carrying half a login.
    pub async fn clear_user(&self) -> Result<(), SessionError> {
        self.session.remove::<SessionUser>(USER_KEY).await?;
        self.session.remove::<i32>(USER_ID_KEY).await?;
        Ok(())
    }

    /// Drop every key and invalidate the old session id server-side; the
    /// replacement cookie references a fresh anonymous session, so a queued
    /// farewell flash still has somewhere to live.
    pub async fn logout(&self) -> Result<(), SessionError> {
        self.session.clear().await;
        self.session.cycle_id().await
    }

    pub async fn add_flash(&self, message: impl Into<String>) -> Result<(), SessionError> {
        let mut flashes = self
            .session
            .get::<Vec<String>>(FLASH_KEY)
            .await?
            .unwrap_or_default();
        flashes.push(message.into());
        self.session.insert(FLASH_KEY, flashes).await
    }

    /// Drain the flash queue: ordered, consumed once.
    pub async fn take_flashes(&self) -> Result<Vec<String>, SessionError> {
        Ok(self
            .session
            .remove::<Vec<String>>(FLASH_KEY)
            .await?
            .unwrap_or_default())
    }
}
