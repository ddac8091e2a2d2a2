//! In-memory cache store

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::{CacheError, CacheStore};
use crate::fetcher::RawRow;

#[derive(Debug, Clone)]
struct MemoryEntry {
    payload: Vec<RawRow>,
    expires_at: DateTime<Utc>,
}

/// Process-local cache shared through a mutex
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, MemoryEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, MemoryEntry>> {
        // Entries are replaced whole, so a poisoned map is still consistent
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Option<Vec<RawRow>> {
        let mut entries = self.entries();
        match entries.get(key) {
            Some(entry) if Utc::now() < entry.expires_at => Some(entry.payload.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn set(&self, key: &str, payload: &[RawRow], ttl_secs: u64) -> Result<(), CacheError> {
        let entry = MemoryEntry {
            payload: payload.to_vec(),
            expires_at: Utc::now() + Duration::seconds(ttl_secs as i64),
        };
        self.entries().insert(key.to_string(), entry);
        Ok(())
    }

    fn invalidate(&self, key: &str) -> Result<(), CacheError> {
        self.entries().remove(key);
        Ok(())
    }
}
