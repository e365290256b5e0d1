use serde::{Deserialize, Serialize};

/// Top-level navigation tabs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    #[default]
    Today,
    Mood,
    Genre,
    ForYou,
    MyList,
}

/// Which chip grid a selection came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChipKind {
    Mood,
    Genre,
}

/// A selectable mood or genre option
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ChipOption {
    pub id: &'static str,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<&'static str>,
}

const fn mood(id: &'static str, label: &'static str, emoji: &'static str) -> ChipOption {
    ChipOption {
        id,
        label,
        emoji: Some(emoji),
    }
}

const fn genre(id: &'static str, label: &'static str) -> ChipOption {
    ChipOption {
        id,
        label,
        emoji: None,
    }
}

pub const MOODS: [ChipOption; 6] = [
    mood("exciting", "신나는", "🎉"),
    mood("sad", "슬픈/이별", "💧"),
    mood("romance", "설레는/고백", "💕"),
    mood("stress", "스트레스 해소", "🔥"),
    mood("calm", "잔잔한/위로", "🍃"),
    mood("duet", "듀엣/함께", "🎤"),
];

pub const GENRES: [ChipOption; 8] = [
    genre("ballad", "발라드"),
    genre("dance", "댄스"),
    genre("hiphop", "힙합/랩"),
    genre("rock", "록/밴드"),
    genre("rnb", "R&B/Soul"),
    genre("trot", "트로트"),
    genre("pop", "POP"),
    genre("indie", "인디"),
];

impl ChipKind {
    pub fn options(&self) -> &'static [ChipOption] {
        match self {
            ChipKind::Mood => &MOODS,
            ChipKind::Genre => &GENRES,
        }
    }

    /// Looks up an option of this kind by id
    pub fn find(&self, id: &str) -> Option<&'static ChipOption> {
        self.options().iter().find(|option| option.id == id)
    }
}

/// An entry in the font size table
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct FontSizeOption {
    pub label: &'static str,
    pub px: u8,
}

pub const FONT_SIZES: [FontSizeOption; 4] = [
    FontSizeOption { label: "작게", px: 14 },
    FontSizeOption { label: "보통", px: 16 },
    FontSizeOption { label: "크게", px: 18 },
    FontSizeOption { label: "아주 크게", px: 20 },
];

/// Index into [`FONT_SIZES`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FontSize(usize);

impl Default for FontSize {
    fn default() -> Self {
        Self(1)
    }
}

impl FontSize {
    /// Returns `None` when `index` is outside the font size table
    pub fn new(index: usize) -> Option<Self> {
        (index < FONT_SIZES.len()).then_some(Self(index))
    }

    pub fn index(&self) -> usize {
        self.0
    }

    pub fn option(&self) -> FontSizeOption {
        FONT_SIZES[self.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_mood_by_id() {
        let option = ChipKind::Mood.find("exciting").unwrap();
        assert_eq!(option.label, "신나는");
        assert_eq!(option.emoji, Some("🎉"));
    }

    #[test]
    fn test_find_is_scoped_to_kind() {
        assert!(ChipKind::Genre.find("exciting").is_none());
        assert_eq!(ChipKind::Genre.find("trot").unwrap().label, "트로트");
    }

    #[test]
    fn test_chip_ids_unique() {
        for kind in [ChipKind::Mood, ChipKind::Genre] {
            let options = kind.options();
            for (i, a) in options.iter().enumerate() {
                assert!(options[i + 1..].iter().all(|b| b.id != a.id));
            }
        }
    }

    #[test]
    fn test_font_size_bounds() {
        assert_eq!(FontSize::default().option().px, 16);
        assert_eq!(FontSize::new(3).unwrap().option().label, "아주 크게");
        assert!(FontSize::new(4).is_none());
    }

    #[test]
    fn test_tab_serialization() {
        assert_eq!(serde_json::to_string(&Tab::ForYou).unwrap(), "\"for_you\"");
        assert_eq!(serde_json::to_string(&Tab::MyList).unwrap(), "\"my_list\"");
    }
}
