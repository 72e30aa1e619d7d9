mod common;

use axum::http::StatusCode;
use serde_json::json;
use shelf_metadata::VolumeInfo;

use common::{volume, StubReply, TestApp};

fn dune() -> VolumeInfo {
    VolumeInfo {
        title: Some("Dune".to_string()),
        authors: vec!["Frank Herbert".to_string()],
        publisher: Some("Ace".to_string()),
        published_date: Some("1965".to_string()),
        description: Some("Desert planet.".to_string()),
    }
}

#[tokio::test]
async fn add_enriches_the_stored_book_and_list_shows_it() {
    let app = TestApp::new(StubReply::Volumes(vec![dune()]));

    let response = app
        .post_form("/add", "title=Dune&author=Frank+Herbert")
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"message": "Book added to DB!"}));
    assert_eq!(app.metadata.queries(), vec!["Dune".to_string()]);

    let books = app.store.books();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].title, "Dune");
    assert_eq!(books[0].author, "Frank Herbert");
    assert_eq!(books[0].authors, Some(vec!["Frank Herbert".to_string()]));
    assert_eq!(books[0].publisher.as_deref(), Some("Ace"));
    assert_eq!(books[0].published_date.as_deref(), Some("1965"));
    assert_eq!(books[0].description.as_deref(), Some("Desert planet."));

    let listed = app.get("/list", None).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(
        listed.body,
        json!([{"title": "Dune", "author": "Frank Herbert"}])
    );
}

#[tokio::test]
async fn add_applies_only_the_first_result() {
    let app = TestApp::new(StubReply::Volumes(vec![
        volume("Emma", &["Jane Austen"], Some("John Murray")),
        volume("Emma (Annotated)", &["Someone Else"], Some("Other House")),
    ]));

    let response = app.post_form("/add", "title=Emma&author=Jane+Austen").await;
    assert_eq!(response.status, StatusCode::OK);

    let book = &app.store.books()[0];
    assert_eq!(book.publisher.as_deref(), Some("John Murray"));
    assert_eq!(book.authors, Some(vec!["Jane Austen".to_string()]));
}

#[tokio::test]
async fn add_without_api_match_keeps_the_unenriched_book() {
    let app = TestApp::new(StubReply::Volumes(Vec::new()));

    let response = app
        .post_form("/add", "title=Obscure&author=Nobody")
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "No book found in API.");

    let books = app.store.books();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].title, "Obscure");
    assert!(books[0].publisher.is_none());
    assert!(books[0].authors.is_none());
}

#[tokio::test]
async fn add_with_failing_api_keeps_the_unenriched_book() {
    let app = TestApp::new(StubReply::Status(503));

    let response = app.post_form("/add", "title=Dune&author=Frank+Herbert").await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.body["message"],
        "Failed to fetch data from Google Books API."
    );

    let books = app.store.books();
    assert_eq!(books.len(), 1);
    assert!(books[0].description.is_none());
}

#[tokio::test]
async fn add_with_missing_fields_stores_nothing() {
    let app = TestApp::new(StubReply::Volumes(vec![dune()]));

    for form in ["author=Frank+Herbert", "title=Dune", "title=&author=Frank+Herbert", ""] {
        let response = app.post_form("/add", form).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "form {form:?}");
        assert_eq!(response.body["message"], "Title and author are required.");
    }

    assert!(app.store.books().is_empty());
    assert!(app.metadata.queries().is_empty());
}

#[tokio::test]
async fn add_keeps_submitted_title_and_author() {
    let app = TestApp::new(StubReply::Volumes(vec![volume(
        "Dune: Deluxe Edition",
        &[],
        Some("Ace"),
    )]));

    let response = app.post_form("/add", "title=Dune&author=F.+Herbert").await;
    assert_eq!(response.status, StatusCode::OK);

    let book = &app.store.books()[0];
    assert_eq!(book.title, "Dune");
    assert_eq!(book.author, "F. Herbert");
    assert!(book.authors.is_none());
    assert_eq!(book.publisher.as_deref(), Some("Ace"));
}

#[tokio::test]
async fn list_on_empty_catalog_is_not_found() {
    let app = TestApp::new(StubReply::Volumes(Vec::new()));

    let response = app.get("/list", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "No books found in the database.");
}

#[tokio::test]
async fn list_preserves_insertion_order() {
    let app = TestApp::new(StubReply::Volumes(Vec::new()));
    for (title, author) in [("A", "x"), ("B", "y"), ("C", "z")] {
        app.post_form("/add", &format!("title={title}&author={author}"))
            .await;
    }

    let response = app.get("/list", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!([
            {"title": "A", "author": "x"},
            {"title": "B", "author": "y"},
            {"title": "C", "author": "z"}
        ])
    );
}

#[tokio::test]
async fn store_failure_is_an_internal_error() {
    let app = TestApp::new(StubReply::Volumes(vec![dune()]));
    app.store.set_offline(true);

    let listed = app.get("/list", None).await;
    assert_eq!(listed.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(listed.body["code"], "internal_error");

    let added = app.post_form("/add", "title=Dune&author=Frank+Herbert").await;
    assert_eq!(added.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(app.metadata.queries().is_empty());
}

#[tokio::test]
async fn search_returns_volume_info_in_provider_order() {
    let app = TestApp::new(StubReply::Volumes(vec![
        dune(),
        volume("Dune Messiah", &["Frank Herbert"], None),
    ]));

    let response = app.get("/search?query=dune", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(app.metadata.queries(), vec!["dune".to_string()]);

    let results = response.body.as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["title"], "Dune");
    assert_eq!(results[0]["publishedDate"], "1965");
    assert_eq!(results[1]["title"], "Dune Messiah");
    assert!(results[1]["publisher"].is_null());
    assert!(results[1]["description"].is_null());
}

#[tokio::test]
async fn search_accepts_the_short_parameter() {
    let app = TestApp::new(StubReply::Volumes(vec![dune()]));

    let response = app.get("/search?q=herbert", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(app.metadata.queries(), vec!["herbert".to_string()]);
}

#[tokio::test]
async fn search_without_query_is_rejected() {
    let app = TestApp::new(StubReply::Volumes(vec![dune()]));

    for uri in ["/search", "/search?query=", "/search?query=%20%20"] {
        let response = app.get(uri, None).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "uri {uri}");
        assert_eq!(response.body["message"], "Please provide a search query.");
    }
    assert!(app.metadata.queries().is_empty());
}

#[tokio::test]
async fn search_without_matches_is_not_found() {
    let app = TestApp::new(StubReply::Volumes(Vec::new()));

    let response = app.get("/search?query=zzzz", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "No books found.");
}

#[tokio::test]
async fn search_with_failing_api_is_an_internal_error() {
    let app = TestApp::new(StubReply::Status(500));

    let response = app.get("/search?query=dune", None).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.body["message"],
        "Failed to fetch data from Google Books API."
    );
}

#[tokio::test]
async fn health_and_openapi_are_served() {
    let app = TestApp::new(StubReply::Volumes(Vec::new()));

    let health = app.get("/healthz", None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert!(health.headers.contains_key("x-request-id"));

    let docs = app.get("/docs/openapi.json", None).await;
    assert_eq!(docs.status, StatusCode::OK);
    for path in ["/add", "/list", "/search", "/register", "/login", "/profile"] {
        assert!(docs.body["paths"].get(path).is_some(), "missing {path}");
    }
}
