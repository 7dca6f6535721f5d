use std::sync::Arc;

use tokio::task::JoinSet;

use crate::{
    error::{AppError, AppResult},
    models::{CandidateVideo, Credentials, RecommendationResult},
    services::{
        providers::VideoPlatform,
        seeds::extract_seeds,
        suggestions::filter_suggestions,
    },
};

/// Separator used in the human-readable "based on" string
pub const BASIS_SEPARATOR: &str = " & ";

/// Tunables for a discovery run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoverySettings {
    /// Liked videos used as seed material
    pub liked_limit: u32,
    /// Search results requested per seed artist
    pub results_per_seed: u32,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            liked_limit: 10,
            results_per_seed: 10,
        }
    }
}

/// Search query that broadens a seed artist into related music
pub fn search_term(seed: &str) -> String {
    format!("{} playlist OR similar artists mix", seed)
}

pub fn compose_basis(seeds: &[String]) -> String {
    seeds.join(BASIS_SEPARATOR)
}

/// Generates recommendations from the user's recently liked videos
///
/// Liked titles are reduced to at most two seed artists, one music search is
/// issued per seed concurrently, and the flattened results (seed order, then
/// relevance order) are filtered against the liked titles.
///
/// Any upstream failure fails the whole run. When no seed can be derived the
/// result is empty rather than an error.
pub async fn derive_recommendations(
    platform: Arc<dyn VideoPlatform>,
    credentials: &Credentials,
    settings: &DiscoverySettings,
) -> AppResult<RecommendationResult> {
    let liked_titles = platform
        .fetch_liked_titles(credentials, settings.liked_limit)
        .await?;

    let seeds = extract_seeds(&liked_titles);

    tracing::info!(
        liked_count = liked_titles.len(),
        seeds = ?seeds,
        provider = platform.name(),
        "Derived discovery seeds"
    );

    if seeds.is_empty() {
        tracing::warn!(
            liked_count = liked_titles.len(),
            "No usable seeds in liked videos, returning empty recommendations"
        );
        return Ok(RecommendationResult::empty());
    }

    let candidates = search_all_seeds(
        platform.clone(),
        credentials,
        &seeds,
        settings.results_per_seed,
    )
    .await?;
    let candidate_count = candidates.len();

    let recommendations = filter_suggestions(candidates, &liked_titles);

    tracing::info!(
        candidates = candidate_count,
        recommendations = recommendations.len(),
        "Recommendations derived"
    );

    Ok(RecommendationResult {
        based_on: compose_basis(&seeds),
        recommendations,
    })
}

/// Runs one search per seed in parallel and concatenates the batches in seed
/// order, regardless of completion order. The first failure to complete
/// aborts the searches still in flight.
async fn search_all_seeds(
    platform: Arc<dyn VideoPlatform>,
    credentials: &Credentials,
    seeds: &[String],
    results_per_seed: u32,
) -> AppResult<Vec<CandidateVideo>> {
    let mut searches = JoinSet::new();

    for (index, seed) in seeds.iter().enumerate() {
        let platform = platform.clone();
        let credentials = credentials.clone();
        let term = search_term(seed);
        searches.spawn(async move {
            let outcome = platform
                .search_by_term(&credentials, &term, results_per_seed)
                .await;
            (index, outcome)
        });
    }

    let mut batches: Vec<Option<Vec<CandidateVideo>>> = vec![None; seeds.len()];

    while let Some(joined) = searches.join_next().await {
        match joined {
            Ok((index, Ok(batch))) => {
                tracing::debug!(seed = %seeds[index], results = batch.len(), "Seed search completed");
                batches[index] = Some(batch);
            }
            Ok((index, Err(e))) => {
                tracing::error!(seed = %seeds[index], error = %e, "Seed search failed");
                searches.abort_all();
                return Err(e);
            }
            Err(e) => {
                tracing::error!(error = %e, "Task join error");
                searches.abort_all();
                return Err(AppError::Internal(e.to_string()));
            }
        }
    }

    Ok(batches.into_iter().flatten().flatten().collect())
}
