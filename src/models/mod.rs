use serde::{Deserialize, Serialize};

pub mod user;
pub mod youtube;

pub use user::{Credentials, UserRecord};

/// A video returned to the client, either from the liked playlist or from a
/// discovery search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CandidateVideo {
    pub title: String,
    pub video_id: String,
    pub thumbnail: String,
}

impl CandidateVideo {
    pub fn new(
        title: impl Into<String>,
        video_id: impl Into<String>,
        thumbnail: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            video_id: video_id.into(),
            thumbnail: thumbnail.into(),
        }
    }
}

/// Outcome of a discovery run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResult {
    /// Seed artists joined with `" & "`, empty when nothing could be derived
    pub based_on: String,
    pub recommendations: Vec<CandidateVideo>,
}

impl RecommendationResult {
    pub fn empty() -> Self {
        Self {
            based_on: String::new(),
            recommendations: Vec::new(),
        }
    }
}

// ============================================================================
// Playlist export
// ============================================================================

/// Request to export recommended videos as a playlist
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlaylistRequest {
    pub video_ids: Vec<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// Created playlist
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistExport {
    pub playlist_id: String,
    pub playlist_url: String,
    pub item_count: usize,
}

impl PlaylistExport {
    pub fn new(playlist_id: String, item_count: usize) -> Self {
        let playlist_url = format!("https://www.youtube.com/playlist?list={}", playlist_id);
        Self {
            playlist_id,
            playlist_url,
            item_count,
        }
    }
}
