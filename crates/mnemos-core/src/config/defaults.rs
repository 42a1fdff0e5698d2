// Single source of truth for all default values.

// --- Storage ---
pub const DEFAULT_DB_FILENAME: &str = "mnemos.db";
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;
pub const DEFAULT_READ_POOL_SIZE: usize = 4;

// --- Embeddings ---
pub const DEFAULT_EMBEDDING_PROVIDER: &str = "tfidf";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 1536;
pub const DEFAULT_EMBEDDING_MAX_RETRIES: u32 = 3;
pub const DEFAULT_EMBEDDING_BATCH_SIZE: usize = 64;

// --- Decay ---
pub const DEFAULT_FADING_THRESHOLD: f64 = 0.3;
pub const DEFAULT_EXEMPT_PROCEDURAL: bool = false;

// --- Reinforcement ---
pub const DEFAULT_SPACING_INTERVAL_DAYS: f64 = 7.0;
pub const DEFAULT_MAX_SPACING_BONUS: f64 = 2.0;
pub const DEFAULT_STABILITY_GAIN: f64 = 0.1;

// --- Links ---
pub const DEFAULT_INITIAL_LINK_STRENGTH: f64 = 0.5;
pub const DEFAULT_LINK_INCREMENT: f64 = 0.1;

// --- Retrieval ---
pub const DEFAULT_RETRIEVAL_LIMIT: usize = 5;
pub const DEFAULT_RELEVANCE_THRESHOLD: f64 = 0.7;
pub const DEFAULT_ASSOCIATION_THRESHOLD: f64 = 0.5;
pub const DEFAULT_DEDUP_THRESHOLD: f64 = 0.92;
pub const DEFAULT_MIN_RETENTION: f64 = 0.0;
pub const DEFAULT_INCLUDE_EXPIRED: bool = false;

// --- Consolidation ---
pub const DEFAULT_SIGNIFICANCE_THRESHOLD: f64 = 0.3;
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.85;
pub const DEFAULT_MIN_CLUSTER_SIZE: usize = 5;
pub const DEFAULT_PROMOTION_STABILITY_THRESHOLD: f64 = 0.9;
pub const DEFAULT_PROMOTION_MIN_ACCESS_COUNT: u64 = 3;
pub const DEFAULT_CAPABILITY_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_CONSOLIDATION_INTERVAL_SECS: u64 = 3_600; // 1 hour
pub const DEFAULT_MAX_TOPICS: usize = 5;
pub const DEFAULT_SUMMARY_SENTENCES: usize = 3;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_LOG_JSON: bool = true;
