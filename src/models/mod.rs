pub mod catalog;
pub mod preferences;
pub mod request;
pub mod song;

pub use catalog::{
    ChipKind, ChipOption, FontSize, FontSizeOption, Tab, FONT_SIZES, GENRES, MOODS,
};
pub use preferences::{Favorites, SearchHistory, SEARCH_HISTORY_LIMIT};
pub use request::RequestDescriptor;
pub use song::{Song, SongCard};
