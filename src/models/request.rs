use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::error::{AppError, AppResult};

/// What was asked for: one of the five recommendation categories
///
/// `Today` carries no query; every other category carries the text it was
/// requested with (mood label, genre label, artist name or taste profile).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "category", content = "query", rename_all = "lowercase")]
pub enum RequestDescriptor {
    Today,
    Mood(String),
    Genre(String),
    Artist(String),
    Custom(String),
}

impl RequestDescriptor {
    /// Category name as used in cache keys and logs
    pub fn category(&self) -> &'static str {
        match self {
            RequestDescriptor::Today => "today",
            RequestDescriptor::Mood(_) => "mood",
            RequestDescriptor::Genre(_) => "genre",
            RequestDescriptor::Artist(_) => "artist",
            RequestDescriptor::Custom(_) => "custom",
        }
    }

    pub fn query(&self) -> Option<&str> {
        match self {
            RequestDescriptor::Today => None,
            RequestDescriptor::Mood(q)
            | RequestDescriptor::Genre(q)
            | RequestDescriptor::Artist(q)
            | RequestDescriptor::Custom(q) => Some(q),
        }
    }
}

impl RequestDescriptor {
    /// Builds a descriptor from a category name and optional query
    ///
    /// Every category but `today` needs a non-blank query; a query sent with
    /// `today` is ignored.
    pub fn from_parts(category: &str, query: Option<String>) -> AppResult<Self> {
        let query = query.map(|q| q.trim().to_string()).filter(|q| !q.is_empty());
        let build: fn(String) -> Self = match category {
            "today" => return Ok(RequestDescriptor::Today),
            "mood" => RequestDescriptor::Mood,
            "genre" => RequestDescriptor::Genre,
            "artist" => RequestDescriptor::Artist,
            "custom" => RequestDescriptor::Custom,
            other => {
                return Err(AppError::InvalidInput(format!(
                    "Unknown category: {}",
                    other
                )))
            }
        };

        query.map(build).ok_or_else(|| {
            AppError::InvalidInput(format!("Category {} requires a query", category))
        })
    }
}

impl Display for RequestDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.category(), self.query().unwrap_or(""))
    }
}
