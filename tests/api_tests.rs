use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};

use music_curator::{
    create_router,
    db::UserStore,
    models::{CandidateVideo, Credentials, UserRecord},
    services::{oauth::TokenGrant, DiscoverySettings, OAuthProvider, VideoPlatform},
    AppError, AppResult, AppState,
};

const USER: &str = "UC_test_channel";
const SESSION: &str = "0b9f5a52-6f0e-4c1e-8d3a-71c2e4f8a913";

// ============================================================================
// In-memory collaborators
// ============================================================================

#[derive(Default)]
struct FakeUserStore {
    users: Mutex<HashMap<String, UserRecord>>,
}

#[async_trait::async_trait]
impl UserStore for FakeUserStore {
    async fn find_by_session(&self, session_token: &str) -> AppResult<Option<UserRecord>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|user| user.session_token == session_token)
            .cloned())
    }

    async fn upsert(&self, user: &UserRecord) -> AppResult<()> {
        let mut users = self.users.lock().unwrap();
        let mut record = user.clone();
        if record.refresh_token.is_none() {
            record.refresh_token = users
                .get(&user.channel_id)
                .and_then(|existing| existing.refresh_token.clone());
        }
        users.insert(record.channel_id.clone(), record);
        Ok(())
    }

    async fn update_access_token(
        &self,
        channel_id: &str,
        access_token: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> AppResult<()> {
        if let Some(user) = self.users.lock().unwrap().get_mut(channel_id) {
            user.access_token = access_token.to_string();
            user.expires_at = expires_at;
        }
        Ok(())
    }
}

impl FakeUserStore {
    fn get(&self, channel_id: &str) -> Option<UserRecord> {
        self.users.lock().unwrap().get(channel_id).cloned()
    }
}

struct FakeOAuth;

#[async_trait::async_trait]
impl OAuthProvider for FakeOAuth {
    fn authorization_url(&self) -> String {
        "https://accounts.example.com/auth?client_id=test".to_string()
    }

    async fn exchange_code(&self, code: &str) -> AppResult<TokenGrant> {
        if code == "bad-code" {
            return Err(AppError::UpstreamFetch("invalid_grant".to_string()));
        }
        Ok(TokenGrant {
            access_token: "access-from-code".to_string(),
            refresh_token: Some("refresh-from-code".to_string()),
            expires_in: Some(3600),
        })
    }

    async fn refresh_access_token(&self, _refresh_token: &str) -> AppResult<TokenGrant> {
        Ok(TokenGrant {
            access_token: "refreshed-access".to_string(),
            refresh_token: None,
            expires_in: Some(3600),
        })
    }
}

#[derive(Default)]
struct FakePlatform {
    liked: Vec<CandidateVideo>,
    searches: HashMap<String, Vec<CandidateVideo>>,
    fail_liked: bool,
    seen_tokens: Mutex<Vec<String>>,
    playlists: Mutex<Vec<(String, Vec<String>)>>,
}

impl FakePlatform {
    fn record_token(&self, credentials: &Credentials) {
        self.seen_tokens
            .lock()
            .unwrap()
            .push(credentials.access_token().to_string());
    }
}

#[async_trait::async_trait]
impl VideoPlatform for FakePlatform {
    async fn fetch_liked_videos(
        &self,
        credentials: &Credentials,
        limit: u32,
    ) -> AppResult<Vec<CandidateVideo>> {
        self.record_token(credentials);
        if self.fail_liked {
            return Err(AppError::UpstreamFetch(
                "YouTube API returned status 403".to_string(),
            ));
        }
        Ok(self.liked.iter().take(limit as usize).cloned().collect())
    }

    async fn search_by_term(
        &self,
        credentials: &Credentials,
        term: &str,
        max_results: u32,
    ) -> AppResult<Vec<CandidateVideo>> {
        self.record_token(credentials);
        Ok(self
            .searches
            .get(term)
            .map(|videos| videos.iter().take(max_results as usize).cloned().collect())
            .unwrap_or_default())
    }

    async fn fetch_channel_id(&self, _credentials: &Credentials) -> AppResult<String> {
        Ok(USER.to_string())
    }

    async fn create_playlist(
        &self,
        _credentials: &Credentials,
        title: &str,
        _description: &str,
    ) -> AppResult<String> {
        let mut playlists = self.playlists.lock().unwrap();
        playlists.push((title.to_string(), Vec::new()));
        Ok(format!("PL{}", playlists.len()))
    }

    async fn add_playlist_item(
        &self,
        _credentials: &Credentials,
        playlist_id: &str,
        video_id: &str,
    ) -> AppResult<()> {
        let index: usize = playlist_id.trim_start_matches("PL").parse().unwrap();
        self.playlists.lock().unwrap()[index - 1]
            .1
            .push(video_id.to_string());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn video(title: &str, id: &str) -> CandidateVideo {
    CandidateVideo::new(title, id, format!("https://i.ytimg.com/vi/{}/default.jpg", id))
}

fn discovery_platform() -> FakePlatform {
    let mut searches = HashMap::new();
    searches.insert(
        "Artist A playlist OR similar artists mix".to_string(),
        vec![video("Song X (Live)", "dup-x"), video("Artist C - Fresh", "c1")],
    );
    searches.insert(
        "Artist B playlist OR similar artists mix".to_string(),
        vec![video("Artist D - New One", "d1"), video("Artist C - Fresh", "c1")],
    );

    FakePlatform {
        liked: vec![
            video("Artist A - Song X", "liked1"),
            video("Artist B - Song Y", "liked2"),
        ],
        searches,
        ..Default::default()
    }
}

fn logged_in_store(expires_at: DateTime<Utc>) -> Arc<FakeUserStore> {
    let store = FakeUserStore::default();
    let mut user = UserRecord::new(
        USER.to_string(),
        "stored-access".to_string(),
        Some("stored-refresh".to_string()),
        Some(expires_at),
    );
    user.session_token = SESSION.to_string();
    store.users.lock().unwrap().insert(USER.to_string(), user);
    Arc::new(store)
}

fn create_test_server(users: Arc<FakeUserStore>, platform: Arc<FakePlatform>) -> TestServer {
    let state = Arc::new(AppState {
        users,
        oauth: Arc::new(FakeOAuth),
        platform,
        discovery: DiscoverySettings::default(),
    });
    TestServer::new(create_router(state)).unwrap()
}

fn session_header(token: &str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-session-token"),
        HeaderValue::from_str(token).unwrap(),
    )
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_root_and_health() {
    let server = create_test_server(
        Arc::new(FakeUserStore::default()),
        Arc::new(FakePlatform::default()),
    );

    let response = server.get("/").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "Music Curator API is running...");

    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server(
        Arc::new(FakeUserStore::default()),
        Arc::new(FakePlatform::default()),
    );

    let id = "6f1d3c1e-8a53-4a6b-9a0e-3b1f2c4d5e6f";
    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static(id),
        )
        .await;

    assert_eq!(response.header("x-request-id"), id);
}

#[tokio::test]
async fn test_login_redirects_to_consent() {
    let server = create_test_server(
        Arc::new(FakeUserStore::default()),
        Arc::new(FakePlatform::default()),
    );

    let response = server.get("/auth/google").await;
    response.assert_status(StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.header("location"),
        "https://accounts.example.com/auth?client_id=test"
    );
}

#[tokio::test]
async fn test_callback_stores_credentials() {
    let users = Arc::new(FakeUserStore::default());
    let server = create_test_server(users.clone(), Arc::new(FakePlatform::default()));

    let response = server
        .get("/auth/google/callback")
        .add_query_param("code", "good-code")
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    let token = body["sessionToken"].as_str().unwrap().to_string();
    assert_ne!(token, USER);

    let stored = users.get(USER).unwrap();
    assert_eq!(stored.session_token, token);
    assert_eq!(stored.access_token, "access-from-code");
    assert_eq!(stored.refresh_token.as_deref(), Some("refresh-from-code"));
    assert!(stored.expires_at.is_some());

    let (name, value) = session_header(&token);
    server
        .get("/youtube/liked-videos")
        .add_header(name, value)
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_relogin_replaces_session_token() {
    let users = logged_in_store(Utc::now() + Duration::hours(1));
    let server = create_test_server(users.clone(), Arc::new(FakePlatform::default()));

    let response = server
        .get("/auth/google/callback")
        .add_query_param("code", "good-code")
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    let new_token = body["sessionToken"].as_str().unwrap();
    assert_ne!(new_token, SESSION);

    let (name, value) = session_header(SESSION);
    let response = server.get("/youtube/liked-videos").add_header(name, value).await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let (name, value) = session_header(new_token);
    let response = server.get("/youtube/liked-videos").add_header(name, value).await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_callback_without_code_is_bad_request() {
    let server = create_test_server(
        Arc::new(FakeUserStore::default()),
        Arc::new(FakePlatform::default()),
    );

    let response = server.get("/auth/google/callback").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "No authorization code provided.");
}

#[tokio::test]
async fn test_callback_exchange_failure_is_bad_gateway() {
    let server = create_test_server(
        Arc::new(FakeUserStore::default()),
        Arc::new(FakePlatform::default()),
    );

    let response = server
        .get("/auth/google/callback")
        .add_query_param("code", "bad-code")
        .await;
    response.assert_status(StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_discover_requires_session() {
    let server = create_test_server(
        Arc::new(FakeUserStore::default()),
        Arc::new(discovery_platform()),
    );

    let response = server.get("/youtube/discover-new").await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let (name, value) = session_header(SESSION);
    let response = server.get("/youtube/discover-new").add_header(name, value).await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_channel_id_is_not_a_session() {
    let platform = Arc::new(discovery_platform());
    let server = create_test_server(
        logged_in_store(Utc::now() + Duration::hours(1)),
        platform.clone(),
    );

    for guess in [USER, "5c1e8f2a-0000-4000-8000-000000000000"] {
        let (name, value) = session_header(guess);
        let response = server.get("/youtube/liked-videos").add_header(name, value).await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    assert!(platform.seen_tokens.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_discover_end_to_end() {
    let platform = Arc::new(discovery_platform());
    let server = create_test_server(
        logged_in_store(Utc::now() + Duration::hours(1)),
        platform.clone(),
    );

    let (name, value) = session_header(SESSION);
    let response = server.get("/youtube/discover-new").add_header(name, value).await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["basedOn"], "Artist A & Artist B");

    let ids: Vec<&str> = body["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["videoId"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["c1", "d1"]);

    let tokens = platform.seen_tokens.lock().unwrap();
    assert!(tokens.iter().all(|t| t == "stored-access"));
}

#[tokio::test]
async fn test_discover_refreshes_expired_token() {
    let users = logged_in_store(Utc::now() - Duration::minutes(5));
    let platform = Arc::new(discovery_platform());
    let server = create_test_server(users.clone(), platform.clone());

    let (name, value) = session_header(SESSION);
    let response = server.get("/youtube/discover-new").add_header(name, value).await;
    response.assert_status_ok();

    let stored = users.get(USER).unwrap();
    assert_eq!(stored.access_token, "refreshed-access");
    assert!(platform
        .seen_tokens
        .lock()
        .unwrap()
        .iter()
        .all(|t| t == "refreshed-access"));
}

#[tokio::test]
async fn test_discover_with_no_seeds_is_empty() {
    let platform = FakePlatform {
        liked: vec![video("#shorts", "s1"), video("AB - Go", "s2")],
        ..Default::default()
    };
    let server = create_test_server(
        logged_in_store(Utc::now() + Duration::hours(1)),
        Arc::new(platform),
    );

    let (name, value) = session_header(SESSION);
    let response = server.get("/youtube/discover-new").add_header(name, value).await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["basedOn"], "");
    assert!(body["recommendations"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_upstream_failure_is_bad_gateway() {
    let platform = FakePlatform {
        fail_liked: true,
        ..Default::default()
    };
    let server = create_test_server(
        logged_in_store(Utc::now() + Duration::hours(1)),
        Arc::new(platform),
    );

    let (name, value) = session_header(SESSION);
    let response = server.get("/youtube/discover-new").add_header(name, value).await;
    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("403"));
}

#[tokio::test]
async fn test_liked_videos() {
    let server = create_test_server(
        logged_in_store(Utc::now() + Duration::hours(1)),
        Arc::new(discovery_platform()),
    );

    let (name, value) = session_header(SESSION);
    let response = server.get("/youtube/liked-videos").add_header(name, value).await;
    response.assert_status_ok();

    let videos: Vec<Value> = response.json();
    assert_eq!(videos.len(), 2);
    assert_eq!(videos[0]["title"], "Artist A - Song X");
    assert_eq!(videos[0]["videoId"], "liked1");
}

#[tokio::test]
async fn test_create_playlist() {
    let platform = Arc::new(FakePlatform::default());
    let server = create_test_server(
        logged_in_store(Utc::now() + Duration::hours(1)),
        platform.clone(),
    );

    let (name, value) = session_header(SESSION);
    let response = server
        .post("/youtube/create-playlist")
        .add_header(name, value)
        .json(&json!({
            "videoIds": ["c1", "d1"],
            "title": "Curated Mix"
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["playlistId"], "PL1");
    assert_eq!(body["playlistUrl"], "https://www.youtube.com/playlist?list=PL1");
    assert_eq!(body["itemCount"], 2);

    let playlists = platform.playlists.lock().unwrap();
    assert_eq!(playlists[0].0, "Curated Mix");
    assert_eq!(playlists[0].1, vec!["c1", "d1"]);
}

#[tokio::test]
async fn test_create_playlist_without_videos() {
    let server = create_test_server(
        logged_in_store(Utc::now() + Duration::hours(1)),
        Arc::new(FakePlatform::default()),
    );

    let (name, value) = session_header(SESSION);
    let response = server
        .post("/youtube/create-playlist")
        .add_header(name, value)
        .json(&json!({ "videoIds": [] }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}
