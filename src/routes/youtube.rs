use std::sync::Arc;

use axum::{extract::State, Extension, Json};

use crate::{
    error::AppResult,
    middleware::{RequestId, Session},
    models::{CandidateVideo, CreatePlaylistRequest, PlaylistExport, RecommendationResult},
    routes::AppState,
    services::{playlist_export::export_playlist, recommendations::derive_recommendations},
};

/// Handler for the liked videos endpoint
pub async fn liked_videos(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    session: Session,
) -> AppResult<Json<Vec<CandidateVideo>>> {
    let videos = state
        .platform
        .fetch_liked_videos(&session.credentials, state.discovery.liked_limit)
        .await?;

    tracing::info!(
        request_id = %request_id,
        channel_id = %session.channel_id,
        count = videos.len(),
        "Liked videos returned"
    );

    Ok(Json(videos))
}

/// Handler for the discovery endpoint
pub async fn discover_new(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    session: Session,
) -> AppResult<Json<RecommendationResult>> {
    tracing::info!(
        request_id = %request_id,
        channel_id = %session.channel_id,
        "Processing discovery request"
    );

    let result = derive_recommendations(
        state.platform.clone(),
        &session.credentials,
        &state.discovery,
    )
    .await?;

    tracing::info!(
        request_id = %request_id,
        based_on = %result.based_on,
        count = result.recommendations.len(),
        "Discovery completed"
    );

    Ok(Json(result))
}

/// Handler for the playlist export endpoint
pub async fn create_playlist(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    session: Session,
    Json(request): Json<CreatePlaylistRequest>,
) -> AppResult<Json<PlaylistExport>> {
    tracing::info!(
        request_id = %request_id,
        channel_id = %session.channel_id,
        video_count = request.video_ids.len(),
        "Processing playlist export"
    );

    let export = export_playlist(
        state.platform.as_ref(),
        &session.credentials,
        request.title.as_deref(),
        &request.video_ids,
    )
    .await?;

    Ok(Json(export))
}
