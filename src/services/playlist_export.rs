use std::collections::HashSet;

use crate::{
    error::{AppError, AppResult},
    models::{Credentials, PlaylistExport},
    services::providers::VideoPlatform,
};

pub const DEFAULT_PLAYLIST_TITLE: &str = "Curated Mix";
const PLAYLIST_DESCRIPTION: &str = "Discovered from your recently liked videos.";

/// Creates a private playlist holding `video_ids` in the given order.
///
/// Items are inserted one at a time so the playlist order matches the
/// recommendation order; the first failed insert aborts the export.
pub async fn export_playlist(
    platform: &dyn VideoPlatform,
    credentials: &Credentials,
    title: Option<&str>,
    video_ids: &[String],
) -> AppResult<PlaylistExport> {
    let mut seen = HashSet::new();
    let video_ids: Vec<&str> = video_ids
        .iter()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty() && seen.insert(*id))
        .collect();

    if video_ids.is_empty() {
        return Err(AppError::InvalidInput(
            "At least one video id is required".to_string(),
        ));
    }

    let title = title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_PLAYLIST_TITLE);

    let playlist_id = platform
        .create_playlist(credentials, title, PLAYLIST_DESCRIPTION)
        .await?;

    for video_id in &video_ids {
        platform
            .add_playlist_item(credentials, &playlist_id, video_id)
            .await?;
    }

    tracing::info!(
        playlist_id = %playlist_id,
        items = video_ids.len(),
        provider = platform.name(),
        "Playlist exported"
    );

    Ok(PlaylistExport::new(playlist_id, video_ids.len()))
}
