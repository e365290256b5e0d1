use std::sync::Arc;

use crate::{
    db::{KeyValueStore, RecommendationCache, StoreWriterHandle},
    services::{
        providers::CompletionClient, PreferenceService, RecommendationService, Session,
    },
};

/// Shared application state
///
/// The session and the stateless recommendation endpoint share one
/// recommendation service, and with it one cache.
pub struct AppState {
    pub recommendations: Arc<RecommendationService>,
    pub preferences: Arc<PreferenceService>,
    pub session: Arc<Session>,
}

impl AppState {
    /// Loads preferences from `store` and wires the services together
    ///
    /// Awaiting `shutdown` on the returned handle flushes queued preference
    /// writes before exit.
    pub async fn new(
        client: Option<Arc<dyn CompletionClient>>,
        cache: RecommendationCache,
        store: Arc<dyn KeyValueStore>,
    ) -> (Self, StoreWriterHandle) {
        let recommendations = Arc::new(RecommendationService::new(client, cache));
        let (preferences, writer_handle) = PreferenceService::load(store).await;
        let preferences = Arc::new(preferences);
        let session = Arc::new(Session::new(recommendations.clone(), preferences.clone()));

        (
            Self {
                recommendations,
                preferences,
                session,
            },
            writer_handle,
        )
    }
}
