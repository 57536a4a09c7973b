//! Memoized join results for virtual bundle materialization.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use semlens_join::JoinResult;
use semlens_model::{DataBundle, JoinDefinition};

/// Cache key: a join and the versions of everything it reads.
///
/// Any edit to the join or either bundle bumps an `updated_at`, so a stale
/// entry can never be returned.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    join_id: String,
    join_updated_at: DateTime<Utc>,
    left_updated_at: DateTime<Utc>,
    right_updated_at: DateTime<Utc>,
}

impl CacheKey {
    fn new(join: &JoinDefinition, left: &DataBundle, right: &DataBundle) -> Self {
        Self {
            join_id: join.id.clone(),
            join_updated_at: join.updated_at,
            left_updated_at: left.updated_at,
            right_updated_at: right.updated_at,
        }
    }
}

/// Join results keyed by entity versions.
#[derive(Debug, Default)]
pub struct JoinCache {
    entries: HashMap<CacheKey, Arc<JoinResult>>,
    hits: u64,
    misses: u64,
}

impl JoinCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached result or compute and store it.
    pub(crate) fn get_or_try_insert<E>(
        &mut self,
        join: &JoinDefinition,
        left: &DataBundle,
        right: &DataBundle,
        compute: impl FnOnce() -> Result<JoinResult, E>,
    ) -> Result<Arc<JoinResult>, E> {
        let key = CacheKey::new(join, left, right);
        if let Some(result) = self.entries.get(&key) {
            self.hits += 1;
            tracing::debug!(join_id = %join.id, "join cache hit");
            return Ok(Arc::clone(result));
        }

        self.misses += 1;
        let result = Arc::new(compute()?);
        // Older versions of the same join can never be requested again.
        self.entries.retain(|existing, _| existing.join_id != key.join_id);
        self.entries.insert(key, Arc::clone(&result));
        Ok(result)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
