use serde::{Deserialize, Serialize};

/// A recommended karaoke song as returned by the model
///
/// Two songs are the same song when title and artist match; `reason` and
/// `tags` do not take part in identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Song {
    pub title: String,
    pub artist: String,
    /// Short pitch for why the song fits the request
    pub reason: String,
    /// Two or three hashtag-style descriptors
    pub tags: Vec<String>,
}

impl Song {
    pub fn new(title: &str, artist: &str, reason: &str, tags: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            artist: artist.to_string(),
            reason: reason.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Whether `other` refers to the same song (title and artist match)
    pub fn is_same_song(&self, other: &Song) -> bool {
        self.title == other.title && self.artist == other.artist
    }

    /// `"title - artist"`, the form used to exclude songs from a prompt
    pub fn exclusion_label(&self) -> String {
        format!("{} - {}", self.title, self.artist)
    }
}

/// A song as displayed in a result list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SongCard {
    #[serde(flatten)]
    pub song: Song,
    pub is_favorite: bool,
}
