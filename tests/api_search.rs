mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::{get_request, send, FakeSearchStore, MemUserStore};

#[tokio::test]
async fn empty_query_returns_empty_data_without_touching_the_store() -> Result<()> {
    let search = FakeSearchStore::new();
    let app = common::test_app(MemUserStore::new(), search.clone());

    let (status, _, body) = send(&app, get_request("/api/search?q=", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"data": []}));

    let (status, _, body) = send(&app, get_request("/api/search", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"data": []}));

    assert_eq!(search.call_count(), 0);

    Ok(())
}

#[tokio::test]
async fn wiki_only_term_returns_only_wiki_tagged_records() -> Result<()> {
    let search = FakeSearchStore::with_corpus(
        &[("Go Basics", "/pages/go", "intro", "en")],
        &[("Rust Patterns", "/wiki/rust", "ownership and borrowing")],
    );
    let app = common::test_app(MemUserStore::new(), search);

    let (status, _, body) = send(&app, get_request("/api/search?q=Patterns", None)).await;

    assert_eq!(status, StatusCode::OK);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["title"], "Rust Patterns");
    assert_eq!(data[0]["source"], "wiki");

    Ok(())
}

#[tokio::test]
async fn page_matches_respect_the_language_filter() -> Result<()> {
    let search = FakeSearchStore::with_corpus(
        &[("Go Basics", "/pages/go", "intro", "en")],
        &[],
    );
    let app = common::test_app(MemUserStore::new(), search);

    // The concrete contract scenario: one English page matching "Basics"
    let (status, _, body) =
        send(&app, get_request("/api/search?q=Basics&language=en", None)).await;
    assert_eq!(status, StatusCode::OK);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["title"], "Go Basics");
    assert_eq!(data[0]["source"], "page");

    // The same term in another language matches nothing
    let (_, _, body) =
        send(&app, get_request("/api/search?q=Basics&language=da", None)).await;
    assert_eq!(body, json!({"data": []}));

    // The language parameter defaults to "en"
    let (_, _, body) = send(&app, get_request("/api/search?q=Basics", None)).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    Ok(())
}

#[tokio::test]
async fn results_come_back_ordered_by_title() -> Result<()> {
    let search = FakeSearchStore::with_corpus(
        &[("Zig Notes", "/pages/zig", "notes on comptime", "en")],
        &[("Ada Notes", "/wiki/ada", "notes on safety")],
    );
    let app = common::test_app(MemUserStore::new(), search);

    let (_, _, body) = send(&app, get_request("/api/search?q=Notes", None)).await;

    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["title"], "Ada Notes");
    assert_eq!(data[1]["title"], "Zig Notes");

    Ok(())
}

#[tokio::test]
async fn search_is_available_to_anonymous_sessions() -> Result<()> {
    let search = FakeSearchStore::with_corpus(
        &[("Go Basics", "/pages/go", "intro", "en")],
        &[],
    );
    let app = common::test_app(MemUserStore::new(), search);

    let (status, _, _) = send(&app, get_request("/api/search?q=Basics", None)).await;
    assert_eq!(status, StatusCode::OK);

    Ok(())
}
