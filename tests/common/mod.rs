#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::{Map, Value};
use tower::ServiceExt;

use quest_api::config::AppConfig;
use quest_api::database::record::{Record, RecordError};
use quest_api::database::users::{DuplicateField, NewUser, StoreError, User, UserStore};
use quest_api::routes;
use quest_api::search::{SearchQuery, SearchStore};
use quest_api::state::AppState;

/// In-memory user store with a create counter, standing in for Postgres.
#[derive(Default)]
pub struct MemUserStore {
    users: Mutex<Vec<User>>,
    pub creates: AtomicUsize,
}

impl MemUserStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Insert a user directly, bypassing the workflow. MIN_COST keeps the
    /// fake fast; verification reads the cost out of the hash.
    pub fn seed(&self, username: &str, email: &str, plaintext: &str, needs_reset: bool) {
        let mut users = self.users.lock().unwrap();
        let id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        users.push(User {
            id,
            username: username.to_string(),
            email: email.to_string(),
            password: bcrypt::hash(plaintext, 4).unwrap(),
            needs_password_reset: needs_reset,
            created_at: Utc::now(),
        });
    }

    pub fn row_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn create_calls(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserStore for MemUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, StoreError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, user: NewUser) -> Result<(), StoreError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::Duplicate(DuplicateField::Username));
        }
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate(DuplicateField::Email));
        }
        let id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        users.push(User {
            id,
            username: user.username,
            email: user.email,
            password: bcrypt::hash(&user.password, 4)?,
            needs_password_reset: false,
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn update_password(&self, id: i32, new_password: &str) -> Result<(), StoreError> {
        let hashed = bcrypt::hash(new_password, 4)?;
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == id) {
            user.password = hashed;
            user.needs_password_reset = false;
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// In-memory stand-in for the two-source search: substring match, language
/// filter on pages only, union ordered by title.
#[derive(Default)]
pub struct FakeSearchStore {
    pages: Vec<(String, String, String, String)>,
    wikis: Vec<(String, String, String)>,
    pub calls: AtomicUsize,
}

impl FakeSearchStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_corpus(
        pages: &[(&str, &str, &str, &str)],
        wikis: &[(&str, &str, &str)],
    ) -> Arc<Self> {
        Arc::new(Self {
            pages: pages
                .iter()
                .map(|(t, u, c, l)| (t.to_string(), u.to_string(), c.to_string(), l.to_string()))
                .collect(),
            wikis: wikis
                .iter()
                .map(|(t, u, c)| (t.to_string(), u.to_string(), c.to_string()))
                .collect(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn search_record(title: &str, url: &str, content: &str, source: &str) -> Record {
    let mut record = Map::new();
    record.insert("title".to_string(), Value::String(title.to_string()));
    record.insert("url".to_string(), Value::String(url.to_string()));
    record.insert("content".to_string(), Value::String(content.to_string()));
    record.insert("source".to_string(), Value::String(source.to_string()));
    record
}

#[async_trait]
impl SearchStore for FakeSearchStore {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Record>, RecordError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let mut rows = Vec::new();
        for (title, url, content, language) in &self.pages {
            if language == &query.language
                && (title.contains(&query.q) || content.contains(&query.q))
            {
                rows.push(search_record(title, url, content, "page"));
            }
        }
        for (title, url, content) in &self.wikis {
            if title.contains(&query.q) || content.contains(&query.q) {
                rows.push(search_record(title, url, content, "wiki"));
            }
        }
        rows.sort_by(|a, b| {
            a.get("title")
                .and_then(Value::as_str)
                .cmp(&b.get("title").and_then(Value::as_str))
        });
        Ok(rows)
    }
}

pub fn test_app(users: Arc<MemUserStore>, search: Arc<FakeSearchStore>) -> Router {
    let state = AppState::new(AppConfig::from_env(), users, search);
    routes::app(state)
}

pub fn get_request(path: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(path);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn form_request(path: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Drive one request through a clone of the app; session state is shared
/// across clones. Returns the status, any session cookie issued, and the
/// parsed JSON body.
pub async fn send(
    app: &Router,
    request: Request<Body>,
) -> (StatusCode, Option<String>, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|v| v.to_string());

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, cookie, body)
}
