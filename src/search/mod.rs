pub mod query;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::record::{self, Record, RecordError};

pub use query::SearchQuery;

/// Search seam, so handlers can be driven against an in-memory fake.
#[async_trait]
pub trait SearchStore: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Record>, RecordError>;
}

/// Executes the two-source union through the generic record mapper; the
/// result shape is whatever columns the statement names, which is what lets
/// JSON handlers and any future renderer share one store.
pub struct PgSearchStore {
    pool: PgPool,
}

impl PgSearchStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SearchStore for PgSearchStore {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Record>, RecordError> {
        let Some((sql, params)) = query.build() else {
            return Ok(Vec::new());
        };
        record::fetch_records(&self.pool, sql, &params).await
    }
}
