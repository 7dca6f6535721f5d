//! YouTube Data API v3 provider
//!
//! All calls are authenticated with the user's OAuth bearer token.
//!
//! API Flow:
//! 1. Liked videos: /playlistItems?playlistId=LL
//! 2. Discovery: /search restricted to type=video and the music category
//! 3. Identity: /channels?mine=true
//! 4. Export: /playlists then one /playlistItems insert per video
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{
        youtube::{
            ApiChannel, ApiListResponse, ApiPlaylist, ApiPlaylistItem, ApiSearchResult,
            NewPlaylist, NewPlaylistItem,
        },
        CandidateVideo, Credentials,
    },
    services::providers::{VideoPlatform, MUSIC_CATEGORY_ID},
};
use reqwest::{Client as HttpClient, RequestBuilder, Response};
use serde::de::DeserializeOwned;

const SEARCH_CACHE_TTL: u64 = 3600; // 1 hour
const LIKED_PLAYLIST_ID: &str = "LL";
/// Page size ceiling enforced by the Data API
const MAX_PAGE_SIZE: u32 = 50;

#[derive(Clone)]
pub struct YouTubeClient {
    http_client: HttpClient,
    api_url: String,
    cache: Cache,
}

impl YouTubeClient {
    pub fn new(cache: Cache, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            cache,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path)
    }

    /// Sends an authorized request and decodes a successful JSON body
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        credentials: &Credentials,
        operation: &str,
    ) -> AppResult<T> {
        let response = request
            .bearer_auth(credentials.access_token())
            .send()
            .await
            .map_err(|e| transport_error(e, operation))?;
        let response = Self::check_status(response, operation).await?;

        response.json::<T>().await.map_err(|e| {
            tracing::error!(error = %e, operation = %operation, "Failed to decode YouTube response");
            AppError::UpstreamFetch(format!("Failed to parse YouTube {} response: {}", operation, e))
        })
    }

    async fn check_status(response: Response, operation: &str) -> AppResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::error!(
            operation = %operation,
            status = %status,
            body = %body,
            "YouTube API request failed"
        );
        Err(AppError::UpstreamFetch(format!(
            "YouTube API returned status {} for {}: {}",
            status, operation, body
        )))
    }
}

fn transport_error(err: reqwest::Error, operation: &str) -> AppError {
    tracing::error!(error = %err, operation = %operation, "YouTube API unreachable");
    AppError::UpstreamFetch(format!("YouTube {} request failed: {}", operation, err))
}

fn page_size(requested: u32) -> String {
    requested.clamp(1, MAX_PAGE_SIZE).to_string()
}

#[async_trait::async_trait]
impl VideoPlatform for YouTubeClient {
    async fn fetch_liked_videos(
        &self,
        credentials: &Credentials,
        limit: u32,
    ) -> AppResult<Vec<CandidateVideo>> {
        let limit = limit as usize;
        let mut videos: Vec<CandidateVideo> = Vec::with_capacity(limit);
        let mut page_token: Option<String> = None;

        // Pages hold at most MAX_PAGE_SIZE entries, so larger limits follow nextPageToken
        while videos.len() < limit {
            let remaining = (limit - videos.len()) as u32;
            let mut request = self.http_client.get(self.endpoint("playlistItems")).query(&[
                ("part", "snippet,contentDetails"),
                ("playlistId", LIKED_PLAYLIST_ID),
                ("maxResults", page_size(remaining).as_str()),
            ]);
            if let Some(token) = page_token.as_deref() {
                request = request.query(&[("pageToken", token)]);
            }

            let page: ApiListResponse<ApiPlaylistItem> =
                self.send_json(request, credentials, "liked videos").await?;

            let page_len = page.items.len();
            videos.extend(page.items.into_iter().filter_map(ApiPlaylistItem::into_candidate));

            match page.next_page_token {
                Some(token) if page_len > 0 => page_token = Some(token),
                _ => break,
            }
        }

        videos.truncate(limit);

        tracing::info!(
            results = videos.len(),
            provider = "youtube",
            "Liked videos fetched"
        );

        Ok(videos)
    }

    async fn search_by_term(
        &self,
        credentials: &Credentials,
        term: &str,
        max_results: u32,
    ) -> AppResult<Vec<CandidateVideo>> {
        if term.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search term cannot be empty".to_string(),
            ));
        }

        let max_results = page_size(max_results);

        cached!(
            self.cache,
            CacheKey::Search {
                term: term.to_string(),
                max_results: max_results.clone(),
            },
            SEARCH_CACHE_TTL,
            async {
                let request = self.http_client.get(self.endpoint("search")).query(&[
                    ("part", "snippet"),
                    ("type", "video"),
                    ("videoCategoryId", MUSIC_CATEGORY_ID),
                    ("q", term),
                    ("maxResults", max_results.as_str()),
                ]);

                let page: ApiListResponse<ApiSearchResult> =
                    self.send_json(request, credentials, "search").await?;

                let videos: Vec<CandidateVideo> = page
                    .items
                    .into_iter()
                    .filter_map(ApiSearchResult::into_candidate)
                    .collect();

                tracing::info!(
                    term = %term,
                    results = videos.len(),
                    provider = "youtube",
                    "Search completed"
                );

                Ok::<_, AppError>(videos)
            }
        )
    }

    async fn fetch_channel_id(&self, credentials: &Credentials) -> AppResult<String> {
        let request = self
            .http_client
            .get(self.endpoint("channels"))
            .query(&[("part", "id"), ("mine", "true")]);

        let page: ApiListResponse<ApiChannel> =
            self.send_json(request, credentials, "channels").await?;

        page.items
            .into_iter()
            .next()
            .map(|channel| channel.id)
            .ok_or_else(|| {
                AppError::UpstreamFetch("Authenticated account has no YouTube channel".to_string())
            })
    }

    async fn create_playlist(
        &self,
        credentials: &Credentials,
        title: &str,
        description: &str,
    ) -> AppResult<String> {
        let request = self
            .http_client
            .post(self.endpoint("playlists"))
            .query(&[("part", "snippet,status")])
            .json(&NewPlaylist::private(title, description));

        let playlist: ApiPlaylist = self.send_json(request, credentials, "playlist insert").await?;

        tracing::info!(playlist_id = %playlist.id, provider = "youtube", "Playlist created");

        Ok(playlist.id)
    }

    async fn add_playlist_item(
        &self,
        credentials: &Credentials,
        playlist_id: &str,
        video_id: &str,
    ) -> AppResult<()> {
        let response = self
            .http_client
            .post(self.endpoint("playlistItems"))
            .query(&[("part", "snippet")])
            .json(&NewPlaylistItem::video(playlist_id, video_id))
            .bearer_auth(credentials.access_token())
            .send()
            .await
            .map_err(|e| transport_error(e, "playlist item insert"))?;

        Self::check_status(response, "playlist item insert").await?;

        tracing::debug!(
            playlist_id = %playlist_id,
            video_id = %video_id,
            "Playlist item added"
        );

        Ok(())
    }

    fn name(&self) -> &'static str {
        "youtube"
    }
}
