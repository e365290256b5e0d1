use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{
    db::{KeyValueStore, StoreWriter, StoreWriterHandle},
    error::{AppError, AppResult},
    models::{Favorites, FontSize, SearchHistory, Song},
};

pub const FAVORITES_KEY: &str = "favorites";
pub const SEARCH_HISTORY_KEY: &str = "search_history";
pub const USER_PROFILE_KEY: &str = "user_profile";
pub const FONT_SIZE_KEY: &str = "font_size";

#[derive(Debug, Default)]
struct Preferences {
    favorites: Favorites,
    search_history: SearchHistory,
    profile: String,
    font_size: FontSize,
}

/// User preferences that survive restarts
///
/// Each key is read once at startup. Every change is queued on the store
/// writer right away; persistence failures are logged and never reach the
/// caller.
pub struct PreferenceService {
    inner: RwLock<Preferences>,
    writer: StoreWriter,
}

impl PreferenceService {
    /// Loads all preferences from `store` and starts the background writer
    ///
    /// Missing, unreadable or malformed values fall back to defaults.
    pub async fn load(store: Arc<dyn KeyValueStore>) -> (Self, StoreWriterHandle) {
        let favorites: Vec<Song> = read_json(store.as_ref(), FAVORITES_KEY).await;
        let history: Vec<String> = read_json(store.as_ref(), SEARCH_HISTORY_KEY).await;
        let profile = read_raw(store.as_ref(), USER_PROFILE_KEY)
            .await
            .unwrap_or_default();
        let font_size = read_json::<Option<usize>>(store.as_ref(), FONT_SIZE_KEY)
            .await
            .and_then(FontSize::new)
            .unwrap_or_default();

        let prefs = Preferences {
            favorites: Favorites::from_songs(favorites),
            search_history: SearchHistory::from_terms(history),
            profile,
            font_size,
        };

        tracing::info!(
            store = store.name(),
            favorites = prefs.favorites.len(),
            history = prefs.search_history.len(),
            "Preferences loaded"
        );

        let (writer, handle) = StoreWriter::spawn(store);

        (
            Self {
                inner: RwLock::new(prefs),
                writer,
            },
            handle,
        )
    }

    pub async fn favorites(&self) -> Vec<Song> {
        self.inner.read().await.favorites.songs().to_vec()
    }

    pub async fn is_favorite(&self, song: &Song) -> bool {
        self.inner.read().await.favorites.contains(song)
    }

    /// Flags each song in `songs` with whether it is a favorite
    pub async fn mark_favorites(&self, songs: &[Song]) -> Vec<bool> {
        let inner = self.inner.read().await;
        songs.iter().map(|s| inner.favorites.contains(s)).collect()
    }

    /// Returns whether the song is a favorite after toggling
    pub async fn toggle_favorite(&self, song: Song) -> bool {
        let mut inner = self.inner.write().await;
        let is_favorite = inner.favorites.toggle(song);
        self.writer
            .set_json_in_background(FAVORITES_KEY, &inner.favorites);
        is_favorite
    }

    pub async fn search_history(&self) -> Vec<String> {
        self.inner.read().await.search_history.terms().to_vec()
    }

    pub async fn push_search(&self, term: &str) {
        let mut inner = self.inner.write().await;
        inner.search_history.push(term);
        self.writer
            .set_json_in_background(SEARCH_HISTORY_KEY, &inner.search_history);
    }

    pub async fn remove_search(&self, term: &str) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        if !inner.search_history.remove(term) {
            return Err(AppError::NotFound(format!(
                "Search term not in history: {}",
                term
            )));
        }
        self.writer
            .set_json_in_background(SEARCH_HISTORY_KEY, &inner.search_history);
        Ok(())
    }

    pub async fn profile(&self) -> String {
        self.inner.read().await.profile.clone()
    }

    pub async fn set_profile(&self, profile: &str) {
        let mut inner = self.inner.write().await;
        if inner.profile == profile {
            return;
        }
        inner.profile = profile.to_string();
        self.writer
            .set_in_background(USER_PROFILE_KEY, profile.to_string());
    }

    pub async fn font_size(&self) -> FontSize {
        self.inner.read().await.font_size
    }

    pub async fn set_font_size(&self, index: usize) -> AppResult<FontSize> {
        let font_size = FontSize::new(index).ok_or_else(|| {
            AppError::InvalidInput(format!("Font size index out of range: {}", index))
        })?;

        let mut inner = self.inner.write().await;
        inner.font_size = font_size;
        self.writer
            .set_json_in_background(FONT_SIZE_KEY, &font_size.index());
        Ok(font_size)
    }
}

async fn read_raw(store: &dyn KeyValueStore, key: &str) -> Option<String> {
    match store.get(key).await {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, key, "Failed to read preference, using default");
            None
        }
    }
}

async fn read_json<T: DeserializeOwned + Default>(store: &dyn KeyValueStore, key: &str) -> T {
    let Some(raw) = read_raw(store, key).await else {
        return T::default();
    };

    serde_json::from_str(&raw).unwrap_or_else(|e| {
        tracing::warn!(error = %e, key, "Malformed stored preference, using default");
        T::default()
    })
}
