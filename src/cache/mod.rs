// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of usd-mcp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Stage cache.
//!
//! Memoizes opened stages by canonical file path. Every `load` re-checks that the cached stage's
//! root layer is still resolvable; stale entries are dropped and reopened. The cache is unbounded
//! unless constructed with [`StageCache::with_capacity`], in which case the least recently loaded
//! entry is evicted first.

pub mod validation;

use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use schemars::JsonSchema;
use serde::Serialize;
use tracing::{debug, warn};

use crate::engine::{OpenError, SceneEngine, StageHandle};

pub use validation::{canonicalize, has_scene_extension, validate_scene_path, PathError};

const STALE_ENTRY_ERROR: &str = "Stage root layer is no longer resolvable";

#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error(transparent)]
    InvalidPath(#[from] PathError),
    #[error("Error loading USD stage: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: OpenError,
    },
    #[error("Failed to open USD stage: {}", path.display())]
    Unusable { path: PathBuf },
}

/// Diagnostic view of one cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct CacheEntryInfo {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_layer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_default_prim: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug)]
struct CacheEntry<S> {
    stage: Arc<S>,
    last_used: u64,
}

pub struct StageCache<E: SceneEngine> {
    engine: E,
    entries: BTreeMap<PathBuf, CacheEntry<E::Stage>>,
    capacity: Option<NonZeroUsize>,
    clock: u64,
}

impl<E: SceneEngine> StageCache<E> {
    pub fn new(engine: E) -> Self {
        Self { engine, entries: BTreeMap::new(), capacity: None, clock: 0 }
    }

    pub fn with_capacity(engine: E, capacity: NonZeroUsize) -> Self {
        Self { capacity: Some(capacity), ..Self::new(engine) }
    }

    pub fn capacity(&self) -> Option<NonZeroUsize> {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Returns the cached stage for `path`, opening it on a miss or when the cached one went stale.
    ///
    /// Validation failures leave the cache untouched. An open failure stores nothing, so the next
    /// call retries the open.
    pub fn load(&mut self, path: &str) -> Result<Arc<E::Stage>, StageError> {
        validate_scene_path(path)?;
        let key = canonicalize(Path::new(path));
        let tick = self.tick();

        if let Some(entry) = self.entries.get_mut(&key) {
            if entry.stage.root_resolvable() {
                debug!(path = %key.display(), "stage cache hit");
                entry.last_used = tick;
                return Ok(Arc::clone(&entry.stage));
            }
            debug!(path = %key.display(), "dropping stale stage");
            self.entries.remove(&key);
        }

        debug!(path = %key.display(), "stage cache miss");
        let stage = match self.engine.open(&key) {
            Ok(stage) => stage,
            Err(source) => {
                warn!(path = %key.display(), error = %source, "failed to open stage");
                return Err(StageError::Open { path: key, source });
            }
        };
        if !stage.root_resolvable() {
            warn!(path = %key.display(), "opened stage has no resolvable root layer");
            return Err(StageError::Unusable { path: key });
        }

        let stage = Arc::new(stage);
        self.entries.insert(key, CacheEntry { stage: Arc::clone(&stage), last_used: tick });
        self.evict_over_capacity();
        Ok(stage)
    }

    /// Cached stage for `path` without loading or re-checking it.
    pub fn get_cached(&self, path: &str) -> Option<Arc<E::Stage>> {
        if path.is_empty() {
            return None;
        }
        let key = canonicalize(Path::new(path));
        self.entries.get(&key).map(|entry| Arc::clone(&entry.stage))
    }

    /// Drops every entry and returns how many were held.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        debug!(count, "stage cache cleared");
        count
    }

    pub fn remove(&mut self, path: &str) -> bool {
        if path.is_empty() {
            return false;
        }
        let key = canonicalize(Path::new(path));
        let removed = self.entries.remove(&key).is_some();
        if removed {
            debug!(path = %key.display(), "stage removed from cache");
        }
        removed
    }

    /// Per-entry validity snapshot keyed by canonical path.
    pub fn cache_info(&self) -> BTreeMap<String, CacheEntryInfo> {
        self.entries
            .iter()
            .map(|(key, entry)| {
                let info = if entry.stage.root_resolvable() {
                    CacheEntryInfo {
                        valid: true,
                        root_layer: Some(entry.stage.identifier().to_owned()),
                        has_default_prim: Some(entry.stage.has_default_prim()),
                        error: None,
                    }
                } else {
                    CacheEntryInfo {
                        valid: false,
                        root_layer: None,
                        has_default_prim: None,
                        error: Some(STALE_ENTRY_ERROR.to_owned()),
                    }
                };
                (key.display().to_string(), info)
            })
            .collect()
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn evict_over_capacity(&mut self) {
        let Some(capacity) = self.capacity else {
            return;
        };
        while self.entries.len() > capacity.get() {
            let Some(oldest) = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(key, _)| key.clone())
            else {
                return;
            };
            debug!(path = %oldest.display(), "evicting least recently used stage");
            self.entries.remove(&oldest);
        }
    }
}
