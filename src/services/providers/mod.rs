//! Text generation provider abstraction
//!
//! The recommendation service talks to the language model only through this
//! trait, so the hosted model can be swapped or replaced by a test double.

use crate::{error::AppResult, services::prompt::GenerationRequest};

pub mod gemini;

pub use gemini::GeminiClient;

/// Trait for hosted text generation backends
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CompletionClient: Send + Sync {
    /// Sends one generation request
    ///
    /// Returns the raw response text, expected to be a JSON array of songs.
    /// `Ok(None)` means the call succeeded but produced no text.
    async fn generate(&self, request: &GenerationRequest) -> AppResult<Option<String>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
