use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use pick_song::{
    api::{create_router, AppState},
    db::{KeyValueStore, MemoryStore, RecommendationCache, StoreWriterHandle},
    error::AppResult,
    models::Song,
    services::{prompt::GenerationRequest, providers::CompletionClient, SessionSnapshot},
};

/// Answers every prompt with two songs named after the call number
#[derive(Default)]
struct StubClient {
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl CompletionClient for StubClient {
    async fn generate(&self, _request: &GenerationRequest) -> AppResult<Option<String>> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let songs = vec![
            Song::new(&format!("song{}-a", n), "artist", "fits", &["#tag"]),
            Song::new(&format!("song{}-b", n), "artist", "fits", &["#tag"]),
        ];
        Ok(Some(serde_json::to_string(&songs).unwrap()))
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

struct TestApp {
    server: TestServer,
    client: Arc<StubClient>,
    store: Arc<MemoryStore>,
    writer: StoreWriterHandle,
}

async fn create_test_app() -> TestApp {
    let client = Arc::new(StubClient::default());
    let store = Arc::new(MemoryStore::new());
    let (state, writer) = AppState::new(
        Some(client.clone()),
        RecommendationCache::unbounded(),
        store.clone(),
    )
    .await;
    let server = TestServer::new(create_router(Arc::new(state))).unwrap();

    TestApp {
        server,
        client,
        store,
        writer,
    }
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app().await;
    let response = app.server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = create_test_app().await;
    let id = "6c1f4b2e-8d1a-4c5e-9f3a-2b7d8e9c0a1b";

    let response = app
        .server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static(id),
        )
        .await;

    assert_eq!(response.header("x-request-id"), id);
}

#[tokio::test]
async fn test_request_id_generated_when_missing() {
    let app = create_test_app().await;
    let response = app.server.get("/api/v1/catalog").await;
    let header = response.header("x-request-id");
    assert!(uuid::Uuid::parse_str(header.to_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_catalog_lists_options() {
    let app = create_test_app().await;
    let catalog: Value = app.server.get("/api/v1/catalog").await.json();

    assert_eq!(catalog["moods"].as_array().unwrap().len(), 6);
    assert_eq!(catalog["genres"].as_array().unwrap().len(), 8);
    assert_eq!(catalog["font_sizes"][1]["px"], 16);
    assert_eq!(catalog["moods"][0]["id"], "exciting");
}

/// Sessions open on the Today tab, so switching away and back fetches it
async fn open_today(app: &TestApp) -> SessionSnapshot {
    app.server
        .post("/api/v1/session/tab")
        .json(&json!({ "tab": "mood" }))
        .await
        .assert_status_ok();
    app.server
        .post("/api/v1/session/tab")
        .json(&json!({ "tab": "today" }))
        .await
        .json()
}

#[tokio::test]
async fn test_today_tab_fetches_songs() {
    let app = create_test_app().await;
    app.server
        .post("/api/v1/session/tab")
        .json(&json!({ "tab": "genre" }))
        .await;

    let response = app
        .server
        .post("/api/v1/session/tab")
        .json(&json!({ "tab": "today" }))
        .await;
    response.assert_status_ok();

    let snapshot: SessionSnapshot = response.json();
    assert_eq!(snapshot.songs.len(), 2);
    assert!(!snapshot.loading);
    assert_eq!(app.client.calls.load(Ordering::SeqCst), 1);

    // Session state survives between requests
    let current: SessionSnapshot = app.server.get("/api/v1/session").await.json();
    assert_eq!(current, snapshot);
}

#[tokio::test]
async fn test_reselecting_current_tab_keeps_songs() {
    let app = create_test_app().await;
    let opened = open_today(&app).await;

    let again: SessionSnapshot = app
        .server
        .post("/api/v1/session/tab")
        .json(&json!({ "tab": "today" }))
        .await
        .json();

    assert_eq!(again, opened);
    assert_eq!(app.client.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_chip_selection_uses_cache_on_repeat() {
    let app = create_test_app().await;

    for _ in 0..2 {
        app.server
            .post("/api/v1/session/chip")
            .json(&json!({ "kind": "genre", "id": "ballad" }))
            .await
            .assert_status_ok();
    }

    assert_eq!(app.client.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unknown_chip_is_bad_request() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/api/v1/session/chip")
        .json(&json!({ "kind": "mood", "id": "ballad" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].is_string());
}

#[tokio::test]
async fn test_load_more_appends_and_refresh_replaces() {
    let app = create_test_app().await;

    app.server
        .post("/api/v1/session/chip")
        .json(&json!({ "kind": "mood", "id": "exciting" }))
        .await;

    let more: SessionSnapshot = app.server.post("/api/v1/session/more").await.json();
    assert_eq!(more.songs.len(), 4);
    assert!(!more.loading_more);

    let refreshed: SessionSnapshot = app.server.post("/api/v1/session/refresh").await.json();
    assert_eq!(refreshed.songs.len(), 2);
    assert_eq!(refreshed.songs[0].song.title, "song3-a");
}

#[tokio::test]
async fn test_load_more_without_request_is_noop() {
    let app = create_test_app().await;

    let snapshot: SessionSnapshot = app.server.post("/api/v1/session/more").await.json();

    assert!(snapshot.songs.is_empty());
    assert_eq!(app.client.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_search_flow_records_history() {
    let app = create_test_app().await;

    app.server
        .put("/api/v1/session/search")
        .json(&json!({ "text": "  IU  " }))
        .await
        .assert_status_ok();
    let searched: SessionSnapshot = app
        .server
        .post("/api/v1/session/search")
        .json(&json!({}))
        .await
        .json();
    assert_eq!(searched.search_query, "IU");
    assert_eq!(searched.songs.len(), 2);

    app.server
        .post("/api/v1/session/search")
        .json(&json!({ "term": "BTS" }))
        .await;

    let focused: SessionSnapshot = app
        .server
        .post("/api/v1/session/search/focus")
        .json(&json!({ "focused": true }))
        .await
        .json();
    assert_eq!(focused.suggestions, vec!["BTS", "IU"]);

    let remaining: Vec<String> = app.server.delete("/api/v1/history/IU").await.json();
    assert_eq!(remaining, vec!["BTS"]);

    app.server
        .delete("/api/v1/history/IU")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blank_search_does_not_fetch() {
    let app = create_test_app().await;

    app.server
        .post("/api/v1/session/search")
        .json(&json!({ "term": "   " }))
        .await
        .assert_status_ok();

    assert_eq!(app.client.calls.load(Ordering::SeqCst), 0);
    let history: Vec<String> = app.server.get("/api/v1/history").await.json();
    assert!(history.is_empty());
}

#[tokio::test]
async fn test_toggle_favorite_marks_session_songs() {
    let app = create_test_app().await;
    let snapshot = open_today(&app).await;
    let song = snapshot.songs[0].song.clone();

    let toggled: Value = app
        .server
        .post("/api/v1/favorites/toggle")
        .json(&json!({ "song": song }))
        .await
        .json();
    assert_eq!(toggled["is_favorite"], true);

    let current: SessionSnapshot = app.server.get("/api/v1/session").await.json();
    assert!(current.songs[0].is_favorite);
    assert!(!current.songs[1].is_favorite);

    let favorites: Vec<Song> = app.server.get("/api/v1/favorites").await.json();
    assert_eq!(favorites, vec![song.clone()]);

    let untoggled: Value = app
        .server
        .post("/api/v1/favorites/toggle")
        .json(&json!({ "song": song }))
        .await
        .json();
    assert_eq!(untoggled["is_favorite"], false);
}

#[tokio::test]
async fn test_profile_submit_fetches_custom() {
    let app = create_test_app().await;

    let snapshot: Value = app
        .server
        .post("/api/v1/session/profile")
        .json(&json!({ "profile": "high notes, rock ballads" }))
        .await
        .json();
    assert_eq!(snapshot["last_request"]["category"], "custom");
    assert_eq!(snapshot["last_request"]["query"], "high notes, rock ballads");

    let profile: Value = app.server.get("/api/v1/profile").await.json();
    assert_eq!(profile["profile"], "high notes, rock ballads");
}

#[tokio::test]
async fn test_font_size_settings() {
    let app = create_test_app().await;

    let current: Value = app.server.get("/api/v1/settings/font-size").await.json();
    assert_eq!(current["index"], 1);
    assert_eq!(current["px"], 16);

    let updated: Value = app
        .server
        .put("/api/v1/settings/font-size")
        .json(&json!({ "index": 3 }))
        .await
        .json();
    assert_eq!(updated["px"], 20);

    app.server
        .put("/api/v1/settings/font-size")
        .json(&json!({ "index": 4 }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_preferences_are_persisted_on_shutdown() {
    let app = create_test_app().await;

    app.server
        .put("/api/v1/profile")
        .json(&json!({ "profile": "duets" }))
        .await
        .assert_status_ok();
    app.server
        .put("/api/v1/settings/font-size")
        .json(&json!({ "index": 0 }))
        .await;

    app.writer.shutdown().await;

    assert_eq!(
        app.store.get("user_profile").await.unwrap().as_deref(),
        Some("duets")
    );
    assert_eq!(app.store.get("font_size").await.unwrap().as_deref(), Some("0"));
}

#[tokio::test]
async fn test_stateless_recommendations() {
    let app = create_test_app().await;

    let songs: Vec<Song> = app
        .server
        .post("/api/v1/recommendations")
        .json(&json!({ "category": "genre", "query": "trot" }))
        .await
        .json();
    assert_eq!(songs.len(), 2);

    let excluded: Vec<Song> = app
        .server
        .post("/api/v1/recommendations")
        .json(&json!({
            "category": "genre",
            "query": "trot",
            "exclude": ["song1-a - artist", "song1-b - artist"]
        }))
        .await
        .json();
    assert_eq!(excluded[0].title, "song2-a");
}

#[tokio::test]
async fn test_recommendations_require_query() {
    let app = create_test_app().await;

    app.server
        .post("/api/v1/recommendations")
        .json(&json!({ "category": "artist" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}
