//! Trait seams: storage, pluggable capabilities, and the clock.

mod capabilities;
mod clock;
mod embedding;
mod storage;

pub use capabilities::{IImportanceScorer, IShortTermSource, ISummarizer, ITopicExtractor};
pub use clock::{Clock, SystemClock};
pub use embedding::IEmbeddingProvider;
pub use storage::{CompressOutcome, ILinkStorage, IMemoryStorage, LinkUpdate};
