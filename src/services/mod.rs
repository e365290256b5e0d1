pub mod fallback;
pub mod preferences;
pub mod prompt;
pub mod providers;
pub mod recommendations;
pub mod session;

pub use preferences::PreferenceService;
pub use recommendations::RecommendationService;
pub use session::{Session, SessionSnapshot};
