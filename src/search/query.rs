use serde_json::Value;

/// The two-source search statement. The language filter applies to the page
/// source only; wiki articles match on text alone. Both sources tag their
/// rows so the caller can tell them apart, and the union is ordered by title.
const SEARCH_SQL: &str = "\
SELECT title, url, content, 'page' AS source \
FROM pages \
WHERE language = $1 AND (title LIKE $2 OR content LIKE $2) \
UNION ALL \
SELECT title, url, content, 'wiki' AS source \
FROM wiki_articles \
WHERE title LIKE $2 OR content LIKE $2 \
ORDER BY title";

/// A free-text search request. Substring matching is left to the store's
/// default text comparison; no case folding happens here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub q: String,
    pub language: String,
}

impl SearchQuery {
    pub fn new(q: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            language: language.into(),
        }
    }

    /// The statement and its bind values, or `None` for an empty query text -
    /// the store is never touched in that case.
    pub fn build(&self) -> Option<(&'static str, Vec<Value>)> {
        if self.q.is_empty() {
            return None;
        }
        let pattern = format!("%{}%", self.q);
        Some((
            SEARCH_SQL,
            vec![Value::String(self.language.clone()), Value::String(pattern)],
        ))
    }
}
