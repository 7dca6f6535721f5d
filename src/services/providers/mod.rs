use crate::{
    error::AppResult,
    models::{CandidateVideo, Credentials},
};

pub mod youtube;

pub use youtube::YouTubeClient;

/// YouTube's category id for music
pub const MUSIC_CATEGORY_ID: &str = "10";

/// Video platform abstraction
///
/// Every call takes the caller's [`Credentials`] explicitly; implementations
/// hold no per-user state and can be shared across requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait VideoPlatform: Send + Sync {
    /// Most recently liked videos, newest first, at most `limit` entries
    async fn fetch_liked_videos(
        &self,
        credentials: &Credentials,
        limit: u32,
    ) -> AppResult<Vec<CandidateVideo>>;

    /// Titles of the most recently liked videos
    async fn fetch_liked_titles(
        &self,
        credentials: &Credentials,
        limit: u32,
    ) -> AppResult<Vec<String>> {
        let videos = self.fetch_liked_videos(credentials, limit).await?;
        Ok(videos.into_iter().map(|v| v.title).collect())
    }

    /// Music-category video search in platform relevance order.
    /// May return fewer than `max_results` entries.
    async fn search_by_term(
        &self,
        credentials: &Credentials,
        term: &str,
        max_results: u32,
    ) -> AppResult<Vec<CandidateVideo>>;

    /// Channel id of the authenticated user
    async fn fetch_channel_id(&self, credentials: &Credentials) -> AppResult<String>;

    /// Creates a private playlist and returns its id
    async fn create_playlist(
        &self,
        credentials: &Credentials,
        title: &str,
        description: &str,
    ) -> AppResult<String>;

    /// Appends a video to the end of a playlist
    async fn add_playlist_item(
        &self,
        credentials: &Credentials,
        playlist_id: &str,
        video_id: &str,
    ) -> AppResult<()>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
