//! Memoized technical summaries.
//!
//! The engine recomputes everything from scratch on every call; callers that
//! render the same symbol repeatedly (a dashboard refresh, a CLI rerun) put a
//! `SummaryCache` in front of it. Entries are keyed by symbol, period, the
//! date of the last bar and the config hash, so new data or a changed config
//! never serves a stale summary.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::AnalysisConfig;
use crate::domain::{Period, PriceSeries};
use crate::summary::{summarize, TechnicalSummary};

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache entry (de)serialization: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("cache lock poisoned")]
    Poisoned,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub symbol: String,
    pub period: Period,
    pub as_of: Option<NaiveDate>,
    pub config_hash: String,
}

impl CacheKey {
    pub fn new(series: &PriceSeries, period: Period, config: &AnalysisConfig) -> Self {
        Self {
            symbol: series.symbol.clone(),
            period,
            as_of: series.last().map(|b| b.date),
            config_hash: config.config_hash(),
        }
    }

    /// Stable hex digest, safe to use as a file name.
    pub fn digest(&self) -> String {
        let as_of = self.as_of.map(|d| d.to_string()).unwrap_or_default();
        let raw = format!(
            "{}|{}|{}|{}",
            self.symbol, self.period, as_of, self.config_hash
        );
        blake3::hash(raw.as_bytes()).to_hex().to_string()
    }
}

/// Backing storage for cached summaries.
pub trait SummaryStore: Send + Sync {
    fn get(&self, key: &CacheKey) -> Result<Option<TechnicalSummary>, CacheError>;

    fn put(&self, key: &CacheKey, summary: &TechnicalSummary) -> Result<(), CacheError>;

    fn remove(&self, key: &CacheKey) -> Result<(), CacheError>;

    fn clear(&self) -> Result<(), CacheError>;

    fn len(&self) -> Result<usize, CacheError>;

    fn is_empty(&self) -> Result<bool, CacheError> {
        Ok(self.len()? == 0)
    }
}

/// In-process store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<CacheKey, TechnicalSummary>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<CacheKey, TechnicalSummary>>, CacheError> {
        self.entries.lock().map_err(|_| CacheError::Poisoned)
    }
}

impl SummaryStore for MemoryStore {
    fn get(&self, key: &CacheKey) -> Result<Option<TechnicalSummary>, CacheError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn put(&self, key: &CacheKey, summary: &TechnicalSummary) -> Result<(), CacheError> {
        self.lock()?.insert(key.clone(), summary.clone());
        Ok(())
    }

    fn remove(&self, key: &CacheKey) -> Result<(), CacheError> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        self.lock()?.clear();
        Ok(())
    }

    fn len(&self) -> Result<usize, CacheError> {
        Ok(self.lock()?.len())
    }
}

/// One JSON file per entry, named by the key digest.
#[derive(Debug, Clone)]
pub struct DiskStore {
    dir: PathBuf,
}

impl DiskStore {
    /// Creates the directory if it doesn't exist.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, CacheError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.digest()))
    }

    fn json_files(&self) -> Result<Vec<PathBuf>, CacheError> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json") {
                files.push(path);
            }
        }
        Ok(files)
    }
}

impl SummaryStore for DiskStore {
    fn get(&self, key: &CacheKey) -> Result<Option<TechnicalSummary>, CacheError> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let json = std::fs::read_to_string(&path)?;
        match serde_json::from_str(&json) {
            Ok(summary) => Ok(Some(summary)),
            Err(err) => {
                // unreadable entry: report a miss so the next put overwrites it
                warn!(path = %path.display(), error = %err, "discarding corrupt cache entry");
                Ok(None)
            }
        }
    }

    fn put(&self, key: &CacheKey, summary: &TechnicalSummary) -> Result<(), CacheError> {
        let json = serde_json::to_string_pretty(summary)?;
        std::fs::write(self.entry_path(key), json)?;
        Ok(())
    }

    fn remove(&self, key: &CacheKey) -> Result<(), CacheError> {
        let path = self.entry_path(key);
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        for path in self.json_files()? {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    fn len(&self) -> Result<usize, CacheError> {
        Ok(self.json_files()?.len())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Summary memoization in front of a store.
pub struct SummaryCache<S: SummaryStore> {
    store: S,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<S: SummaryStore> SummaryCache<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Summary of the trailing `period` of `series`, computed at most once per
    /// key.
    pub fn get_or_compute(
        &self,
        series: &PriceSeries,
        period: Period,
        config: &AnalysisConfig,
    ) -> Result<TechnicalSummary, CacheError> {
        let key = CacheKey::new(series, period, config);

        if let Some(summary) = self.store.get(&key)? {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(symbol = %key.symbol, period = %key.period, "summary cache hit");
            return Ok(summary);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(symbol = %key.symbol, period = %key.period, "summary cache miss");

        let summary = summarize(&series.trailing(period), config);
        self.store.put(&key, &summary)?;
        Ok(summary)
    }

    pub fn invalidate(&self, key: &CacheKey) -> Result<(), CacheError> {
        self.store.remove(key)
    }
}
