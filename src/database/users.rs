use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;

use crate::auth::password;

/// Which uniqueness constraint a registration collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateField {
    Username,
    Email,
    /// Unique violation on the users table whose constraint we don't know.
    Unknown,
}

impl DuplicateField {
    pub fn message(&self) -> &'static str {
        match self {
            DuplicateField::Username => "Username already exists",
            DuplicateField::Email => "Email already registered",
            DuplicateField::Unknown => "Username or email already exists",
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{}", .0.message())]
    Duplicate(DuplicateField),

    /// Hashing/verification failed (malformed hash, algorithm error). This is
    /// a persistence-layer fault, not a wrong password.
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// A user row. The password field holds the bcrypt hash; it is skipped on
/// serialization so a user can never leak its hash through a response body.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub needs_password_reset: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for user creation. `password` is plaintext here and is hashed by the
/// store before anything is persisted.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Persistence seam for users, so the auth workflow and the HTTP layer can be
/// exercised against an in-memory fake.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Hashes the password and inserts the user. A uniqueness collision maps
    /// to `StoreError::Duplicate` naming the field that fired.
    async fn create(&self, user: NewUser) -> Result<(), StoreError>;

    /// Replace the password hash and clear the forced-reset flag in one
    /// statement, so the two can never diverge.
    async fn update_password(&self, id: i32, new_password: &str) -> Result<(), StoreError>;

    /// Connectivity probe for the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;
}

const USER_COLUMNS: &str = "id, username, email, password, needs_password_reset, created_at";

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create(&self, user: NewUser) -> Result<(), StoreError> {
        let hashed = password::hash_password(&user.password)?;

        let result = sqlx::query("INSERT INTO users (username, email, password) VALUES ($1, $2, $3)")
            .bind(&user.username)
            .bind(&user.email)
            .bind(&hashed)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) => match duplicate_field(&err) {
                Some(field) => Err(StoreError::Duplicate(field)),
                None => Err(StoreError::Sqlx(err)),
            },
        }
    }

    async fn update_password(&self, id: i32, new_password: &str) -> Result<(), StoreError> {
        let hashed = password::hash_password(new_password)?;

        sqlx::query("UPDATE users SET password = $1, needs_password_reset = FALSE WHERE id = $2")
            .bind(&hashed)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Classify a driver error as a uniqueness collision, naming the field from
/// the constraint that fired.
fn duplicate_field(err: &sqlx::Error) -> Option<DuplicateField> {
    if let sqlx::Error::Database(db_err) = err {
        if db_err.is_unique_violation() {
            return Some(classify_constraint(db_err.constraint()));
        }
    }
    None
}

fn classify_constraint(constraint: Option<&str>) -> DuplicateField {
    match constraint {
        Some("users_username_key") => DuplicateField::Username,
        Some("users_email_key") => DuplicateField::Email,
        _ => DuplicateField::Unknown,
    }
}
