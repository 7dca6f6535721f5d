// ============================================================================
// YouTube Data API v3 types
// ============================================================================

use serde::{Deserialize, Serialize};

use super::CandidateVideo;

/// Generic list envelope (`playlistItems.list`, `search.list`, `channels.list`)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiListResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiThumbnail {
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiThumbnails {
    #[serde(default)]
    pub default: Option<ApiThumbnail>,
    #[serde(default)]
    pub medium: Option<ApiThumbnail>,
    #[serde(default)]
    pub high: Option<ApiThumbnail>,
}

impl ApiThumbnails {
    /// Smallest available thumbnail URL
    pub fn best_small(&self) -> String {
        self.default
            .as_ref()
            .or(self.medium.as_ref())
            .or(self.high.as_ref())
            .map(|t| t.url.clone())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiSnippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub thumbnails: ApiThumbnails,
}

/// Item of the liked playlist (`playlistId=LL`)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPlaylistItem {
    #[serde(default)]
    pub snippet: Option<ApiSnippet>,
    #[serde(default)]
    pub content_details: Option<ApiPlaylistItemContentDetails>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPlaylistItemContentDetails {
    #[serde(default)]
    pub video_id: Option<String>,
}

impl ApiPlaylistItem {
    /// Deleted or private entries carry no video id and are dropped
    pub fn into_candidate(self) -> Option<CandidateVideo> {
        let video_id = self.content_details?.video_id?;
        let snippet = self.snippet.unwrap_or_default();
        Some(CandidateVideo {
            title: snippet.title,
            video_id,
            thumbnail: snippet.thumbnails.best_small(),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSearchResult {
    pub id: ApiSearchResultId,
    #[serde(default)]
    pub snippet: Option<ApiSnippet>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSearchResultId {
    #[serde(default)]
    pub video_id: Option<String>,
}

impl ApiSearchResult {
    /// Only `youtube#video` hits have a video id
    pub fn into_candidate(self) -> Option<CandidateVideo> {
        let video_id = self.id.video_id?;
        let snippet = self.snippet.unwrap_or_default();
        Some(CandidateVideo {
            title: snippet.title,
            video_id,
            thumbnail: snippet.thumbnails.best_small(),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiChannel {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiPlaylist {
    pub id: String,
}

/// Body of `playlists.insert`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlaylist {
    pub snippet: NewPlaylistSnippet,
    pub status: NewPlaylistStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewPlaylistSnippet {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlaylistStatus {
    pub privacy_status: String,
}

impl NewPlaylist {
    pub fn private(title: &str, description: &str) -> Self {
        Self {
            snippet: NewPlaylistSnippet {
                title: title.to_string(),
                description: description.to_string(),
            },
            status: NewPlaylistStatus {
                privacy_status: "private".to_string(),
            },
        }
    }
}

/// Body of `playlistItems.insert`
#[derive(Debug, Clone, Serialize)]
pub struct NewPlaylistItem {
    pub snippet: NewPlaylistItemSnippet,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlaylistItemSnippet {
    pub playlist_id: String,
    pub resource_id: ResourceId,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceId {
    pub kind: String,
    pub video_id: String,
}

impl NewPlaylistItem {
    pub fn video(playlist_id: &str, video_id: &str) -> Self {
        Self {
            snippet: NewPlaylistItemSnippet {
                playlist_id: playlist_id.to_string(),
                resource_id: ResourceId {
                    kind: "youtube#video".to_string(),
                    video_id: video_id.to_string(),
                },
            },
        }
    }
}
