use std::sync::Arc;

use crate::{
    db::{CacheKey, RecommendationCache},
    error::{AppError, AppResult},
    models::{RequestDescriptor, Song},
    services::{
        fallback::fallback_songs,
        prompt::GenerationRequest,
        providers::CompletionClient,
    },
};

/// Fetches karaoke recommendations from the language model
///
/// This is the error boundary for everything model-related: a missing client,
/// a failed call, an empty response or a payload that does not match the song
/// shape all resolve to the fallback list instead of an error.
///
/// Only first-page results (no exclusions) that contain at least one song are
/// cached. Concurrent fetches for the same key are not coordinated; the last
/// successful write wins.
pub struct RecommendationService {
    client: Option<Arc<dyn CompletionClient>>,
    cache: RecommendationCache,
}

impl RecommendationService {
    /// `client` is `None` when no credentials are configured
    pub fn new(client: Option<Arc<dyn CompletionClient>>, cache: RecommendationCache) -> Self {
        if client.is_none() {
            tracing::warn!(
                "No generation client configured, recommendations will use the fallback list"
            );
        }
        Self { client, cache }
    }

    pub fn cache(&self) -> &RecommendationCache {
        &self.cache
    }

    /// Returns songs for `request`, never failing
    ///
    /// `exclude` holds `"title - artist"` labels the model should skip; when it
    /// is non-empty the cache is neither read nor written. `force_refresh`
    /// skips the cache read but still stores a successful result.
    #[tracing::instrument(
        skip(self, exclude),
        fields(request = %request, excluded = exclude.len())
    )]
    pub async fn fetch_recommendations(
        &self,
        request: &RequestDescriptor,
        exclude: &[String],
        force_refresh: bool,
    ) -> Vec<Song> {
        let Some(client) = &self.client else {
            let e = AppError::MissingCredentials("Gemini API key is not set".to_string());
            tracing::error!(error = %e, "Serving fallback recommendations");
            return fallback_songs();
        };

        let key = CacheKey::from(request);
        let first_page = exclude.is_empty();

        if first_page && !force_refresh {
            if let Some(cached) = self.cache.get(&key).await {
                tracing::debug!(key = %key, "Cache hit");
                return cached;
            }
            tracing::debug!(key = %key, "Cache miss");
        }

        match self.generate(client.as_ref(), request, exclude).await {
            Ok(songs) => {
                if first_page && !songs.is_empty() {
                    self.cache.insert(key, songs.clone()).await;
                }

                tracing::info!(
                    songs = songs.len(),
                    provider = client.name(),
                    "Recommendations fetched"
                );

                songs
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    provider = client.name(),
                    "Recommendation fetch failed, serving fallback"
                );
                fallback_songs()
            }
        }
    }

    async fn generate(
        &self,
        client: &dyn CompletionClient,
        request: &RequestDescriptor,
        exclude: &[String],
    ) -> AppResult<Vec<Song>> {
        let generation = GenerationRequest::for_request(request, exclude);

        let text = client
            .generate(&generation)
            .await?
            .ok_or_else(|| AppError::ExternalApi("Empty response from model".to_string()))?;

        parse_songs(&text)
    }
}

/// Parses a model response as a JSON array of songs
///
/// Every field is required; a song with a blank title or artist breaks the
/// response contract and rejects the whole payload.
pub fn parse_songs(text: &str) -> AppResult<Vec<Song>> {
    let songs: Vec<Song> = serde_json::from_str(text.trim())?;

    if let Some(bad) = songs
        .iter()
        .find(|s| s.title.trim().is_empty() || s.artist.trim().is_empty())
    {
        return Err(AppError::ExternalApi(format!(
            "Model returned a song without title or artist: {:?}",
            bad
        )));
    }

    Ok(songs)
}
