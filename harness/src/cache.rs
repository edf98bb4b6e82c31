//! Load-once model cache.
//!
//! Serving code resolves a model id to an `Arc<Model>` through
//! [`ModelCache::get_or_load`]. The artifact file is read and parsed only on a
//! miss, and never while the cache lock is held; two threads missing on the
//! same id may both load, and the later insert wins. Both loads yield equal
//! models, so the race only costs time.
//!
//! Bounded by entry count and estimated bytes, evicting least-recently-used
//! entries first. An entry left idle for the TTL is reloaded on next access;
//! every hit restarts its idle clock.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use reconscore_kernel::artifact::Model;

use crate::artifact_file::{load_artifact_file, ArtifactFileError};
use crate::config::CacheConfig;

/// Counters and current occupancy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub bytes: usize,
    pub hits: u64,
    pub misses: u64,
    /// Entries removed to respect `max_entries` or `max_bytes`.
    pub evictions: u64,
    /// Entries dropped after sitting idle for the TTL.
    pub expirations: u64,
}

#[derive(Debug)]
struct Entry {
    path: PathBuf,
    model: Arc<Model>,
    bytes: usize,
    last_access: Instant,
    last_used: u64,
}

#[derive(Debug, Default)]
struct Inner {
    entries: BTreeMap<String, Entry>,
    bytes: usize,
    tick: u64,
    hits: u64,
    misses: u64,
    evictions: u64,
    expirations: u64,
}

impl Inner {
    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    fn remove(&mut self, id: &str) -> Option<Entry> {
        let entry = self.entries.remove(id)?;
        self.bytes -= entry.bytes;
        Some(entry)
    }

    fn least_recently_used(&self) -> Option<String> {
        self.entries
            .iter()
            .min_by_key(|(_, e)| e.last_used)
            .map(|(id, _)| id.clone())
    }
}

/// Thread-safe, bounded model cache.
#[derive(Debug)]
pub struct ModelCache {
    max_entries: usize,
    max_bytes: usize,
    ttl: Duration,
    inner: Mutex<Inner>,
}

impl ModelCache {
    #[must_use]
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_limits(config.max_entries, config.max_bytes, config.ttl())
    }

    /// `max_entries` below 1 is treated as 1.
    #[must_use]
    pub fn with_limits(max_entries: usize, max_bytes: usize, ttl: Duration) -> Self {
        Self {
            max_entries: max_entries.max(1),
            max_bytes,
            ttl,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Return the cached model for `id`, loading it from `path` on a miss.
    ///
    /// A cached entry only counts as a hit if it was loaded from the same
    /// path and has been accessed within the TTL. A hit refreshes the access
    /// time.
    ///
    /// # Errors
    ///
    /// Any [`ArtifactFileError`] from loading. Nothing is cached on failure.
    pub fn get_or_load(&self, id: &str, path: &Path) -> Result<Arc<Model>, ArtifactFileError> {
        {
            let mut inner = self.inner.lock();
            let tick = inner.next_tick();
            let fresh = match inner.entries.get_mut(id) {
                Some(e) if e.path == path && e.last_access.elapsed() < self.ttl => {
                    e.last_used = tick;
                    e.last_access = Instant::now();
                    Some(Arc::clone(&e.model))
                }
                _ => None,
            };
            if let Some(model) = fresh {
                inner.hits += 1;
                return Ok(model);
            }
            if let Some(stale) = inner.remove(id) {
                if stale.path == path {
                    inner.expirations += 1;
                }
            }
            inner.misses += 1;
        }

        let model = Arc::new(load_artifact_file(path)?);
        let bytes = model.estimated_bytes();
        if bytes > self.max_bytes {
            tracing::warn!(
                id,
                bytes,
                max_bytes = self.max_bytes,
                "model exceeds cache byte limit, not cached"
            );
            return Ok(model);
        }

        let mut inner = self.inner.lock();
        inner.remove(id);
        while inner.entries.len() >= self.max_entries || inner.bytes + bytes > self.max_bytes {
            let Some(victim) = inner.least_recently_used() else {
                break;
            };
            inner.remove(&victim);
            inner.evictions += 1;
            tracing::debug!(id = %victim, "model evicted");
        }
        let tick = inner.next_tick();
        inner.entries.insert(
            id.to_string(),
            Entry {
                path: path.to_path_buf(),
                model: Arc::clone(&model),
                bytes,
                last_access: Instant::now(),
                last_used: tick,
            },
        );
        inner.bytes += bytes;
        tracing::info!(
            id,
            path = %path.display(),
            bytes,
            entries = inner.entries.len(),
            digest = %model.digest(),
            "model cached"
        );
        Ok(model)
    }

    /// Drop `id` from the cache. Returns whether it was present.
    pub fn invalidate(&self, id: &str) -> bool {
        self.inner.lock().remove(id).is_some()
    }

    /// Drop every entry. Counters are kept.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.bytes = 0;
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        CacheStats {
            entries: inner.entries.len(),
            bytes: inner.bytes,
            hits: inner.hits,
            misses: inner.misses,
            evictions: inner.evictions,
            expirations: inner.expirations,
        }
    }
}
