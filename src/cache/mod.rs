//! Local cache for the last-known record set
//!
//! Provides a `CacheManager` that persists serializable data to JSON files,
//! supporting graceful degradation when the remote sheet is unavailable.

pub mod manager;

pub use manager::{CacheManager, CachedData};

/// Cache key under which the full customer record set is stored
pub const RECORDS_CACHE_KEY: &str = "records";
