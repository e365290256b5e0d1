pub mod cache;
pub mod store;
pub mod writer;

pub use cache::{CacheKey, RecommendationCache};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use writer::{StoreWriter, StoreWriterHandle};
