use serde::{Deserialize, Serialize};

use super::Song;

/// Maximum number of remembered search terms
pub const SEARCH_HISTORY_LIMIT: usize = 5;

/// Favorited songs in insertion order, unique by title and artist
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Favorites(Vec<Song>);

impl Favorites {
    /// Builds a favorites list from stored songs, dropping repeated entries
    pub fn from_songs(songs: Vec<Song>) -> Self {
        let mut favorites = Self::default();
        for song in songs {
            if !favorites.contains(&song) {
                favorites.0.push(song);
            }
        }
        favorites
    }

    pub fn contains(&self, song: &Song) -> bool {
        self.0.iter().any(|f| f.is_same_song(song))
    }

    /// Adds the song if absent, removes it otherwise
    ///
    /// Returns whether the song is a favorite afterwards.
    pub fn toggle(&mut self, song: Song) -> bool {
        if self.contains(&song) {
            self.0.retain(|f| !f.is_same_song(&song));
            false
        } else {
            self.0.push(song);
            true
        }
    }

    pub fn songs(&self) -> &[Song] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Recent artist searches, most recent first
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct SearchHistory(Vec<String>);

impl SearchHistory {
    /// Builds a history from stored terms, keeping the first occurrence of
    /// each term and at most [`SEARCH_HISTORY_LIMIT`] entries
    pub fn from_terms(terms: Vec<String>) -> Self {
        let mut history = Vec::with_capacity(SEARCH_HISTORY_LIMIT);
        for term in terms {
            if history.len() == SEARCH_HISTORY_LIMIT {
                break;
            }
            if !history.contains(&term) {
                history.push(term);
            }
        }
        Self(history)
    }

    /// Moves `term` to the front, inserting it if new
    pub fn push(&mut self, term: &str) {
        self.0.retain(|t| t != term);
        self.0.insert(0, term.to_string());
        self.0.truncate(SEARCH_HISTORY_LIMIT);
    }

    /// Returns whether the term was present
    pub fn remove(&mut self, term: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|t| t != term);
        self.0.len() != before
    }

    pub fn terms(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(title: &str, artist: &str) -> Song {
        Song::new(title, artist, "", &[])
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut favorites = Favorites::default();
        assert!(favorites.toggle(song("응급실", "izi")));
        assert_eq!(favorites.len(), 1);
        assert!(!favorites.toggle(song("응급실", "izi")));
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_toggle_twice_restores_original() {
        let mut favorites = Favorites::from_songs(vec![song("소주 한 잔", "임창정")]);
        let original = favorites.clone();

        favorites.toggle(song("응급실", "izi"));
        favorites.toggle(song("응급실", "izi"));

        assert_eq!(favorites, original);
    }

    #[test]
    fn test_toggle_matches_on_title_and_artist_only() {
        let mut favorites = Favorites::default();
        favorites.toggle(Song::new("응급실", "izi", "국룰", &["#이별"]));
        let added = favorites.toggle(Song::new("응급실", "izi", "다른 이유", &[]));
        assert!(!added);
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_favorites_keep_insertion_order() {
        let mut favorites = Favorites::default();
        favorites.toggle(song("a", "x"));
        favorites.toggle(song("b", "y"));
        favorites.toggle(song("c", "z"));
        let titles: Vec<_> = favorites.songs().iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_from_songs_drops_duplicates() {
        let favorites = Favorites::from_songs(vec![song("a", "x"), song("a", "x"), song("a", "y")]);
        assert_eq!(favorites.len(), 2);
    }

    #[test]
    fn test_history_push_moves_duplicate_to_front() {
        let mut history = SearchHistory::from_terms(vec!["아이유".to_string(), "BTS".to_string()]);
        history.push("아이유");
        assert_eq!(history.terms(), &["아이유".to_string(), "BTS".to_string()]);

        history.push("BTS");
        assert_eq!(history.terms(), &["BTS".to_string(), "아이유".to_string()]);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_history_bounded() {
        let mut history = SearchHistory::default();
        for term in ["a", "b", "c", "d", "e", "f", "g"] {
            history.push(term);
        }
        assert_eq!(history.len(), SEARCH_HISTORY_LIMIT);
        assert_eq!(history.terms()[0], "g");
        assert!(!history.terms().contains(&"a".to_string()));
    }

    #[test]
    fn test_history_remove() {
        let mut history = SearchHistory::default();
        history.push("아이유");
        history.push("BTS");
        assert!(history.remove("아이유"));
        assert!(!history.remove("아이유"));
        assert_eq!(history.terms(), &["BTS".to_string()]);
    }

    #[test]
    fn test_from_terms_normalizes_stored_data() {
        let stored = ["a", "b", "a", "c", "d", "e", "f"]
            .iter()
            .map(|t| t.to_string())
            .collect();
        let history = SearchHistory::from_terms(stored);
        assert_eq!(history.terms(), &["a", "b", "c", "d", "e"].map(String::from));
    }
}
