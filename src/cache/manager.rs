//! File-backed cache store
//!
//! Provides a `CacheManager` that stores serializable data as JSON files with
//! expiry timestamps. Each write replaces the whole file atomically.

use chrono::{DateTime, Duration, Utc};
use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use tempfile::NamedTempFile;

use super::{CacheError, CacheStore};
use crate::fetcher::RawRow;

/// Wrapper struct for cached data stored on disk
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry<T> {
    /// The cached data
    data: T,
    /// When the data was cached
    cached_at: DateTime<Utc>,
    /// When the cache entry expires
    expires_at: DateTime<Utc>,
}

/// Result of reading from cache, including metadata about cache freshness
#[derive(Debug)]
pub struct CachedData<T> {
    /// The cached data
    pub data: T,
    /// When the data was originally cached
    pub cached_at: DateTime<Utc>,
    /// Whether the cache entry has expired
    pub is_expired: bool,
}

/// Manages reading and writing cached data to disk
///
/// Entries live as `<key>.json` in an XDG-compliant cache directory
/// (`~/.cache/prodlist/` on Linux). [`CacheManager::read`] still returns
/// expired entries flagged with `is_expired`; the [`CacheStore`] view hides them.
#[derive(Debug, Clone)]
pub struct CacheManager {
    /// Directory where cache files are stored
    cache_dir: PathBuf,
}

impl CacheManager {
    /// Creates a new CacheManager using the XDG-compliant cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "prodlist")?;
        let cache_dir = project_dirs.cache_dir().to_path_buf();
        Some(Self { cache_dir })
    }

    /// Creates a new CacheManager with a custom cache directory
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Directory holding the cache files
    pub fn dir(&self) -> &PathBuf {
        &self.cache_dir
    }

    /// Returns the path to a cache file for the given key
    fn cache_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key))
    }

    /// Ensures the cache directory exists
    fn ensure_dir(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.cache_dir)
    }

    /// Writes data to the cache with a TTL in seconds
    ///
    /// Each write goes to its own temporary file in the cache directory, which
    /// is then renamed over the previous entry. Readers never observe a partial
    /// record, and concurrent writers end in last-write-wins.
    pub fn write<T: Serialize>(&self, key: &str, data: &T, ttl_secs: u64) -> Result<(), CacheError> {
        self.ensure_dir()?;

        let now = Utc::now();
        let entry = CacheEntry {
            data,
            cached_at: now,
            expires_at: now + Duration::seconds(ttl_secs as i64),
        };

        let json = serde_json::to_string_pretty(&entry)?;

        let mut tmp = NamedTempFile::new_in(&self.cache_dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.persist(self.cache_path(key)).map_err(|e| e.error)?;
        Ok(())
    }

    /// Reads data from the cache
    ///
    /// Returns `None` if the entry doesn't exist or cannot be parsed.
    /// Expired entries are returned with `is_expired = true`.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Option<CachedData<T>> {
        let path = self.cache_path(key);
        let content = fs::read_to_string(path).ok()?;
        let entry: CacheEntry<T> = serde_json::from_str(&content).ok()?;

        let now = Utc::now();
        let is_expired = now >= entry.expires_at;

        Some(CachedData {
            data: entry.data,
            cached_at: entry.cached_at,
            is_expired,
        })
    }

    /// Deletes the cache file for `key`, ignoring a missing file
    pub fn remove(&self, key: &str) -> Result<(), CacheError> {
        match fs::remove_file(self.cache_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl CacheStore for CacheManager {
    fn get(&self, key: &str) -> Option<Vec<RawRow>> {
        self.read::<Vec<RawRow>>(key)
            .filter(|cached| !cached.is_expired)
            .map(|cached| cached.data)
    }

    fn set(&self, key: &str, payload: &[RawRow], ttl_secs: u64) -> Result<(), CacheError> {
        self.write(key, &payload, ttl_secs)
    }

    fn invalidate(&self, key: &str) -> Result<(), CacheError> {
        self.remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration as StdDuration;
    use tempfile::TempDir;

    fn create_test_cache() -> (CacheManager, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let cache = CacheManager::with_dir(temp_dir.path().to_path_buf());
        (cache, temp_dir)
    }

    fn rows() -> Vec<RawRow> {
        let value = json!([
            {"countryCode": "FR", "countryName": "France"},
            {"countryCode": "US", "countryName": "United States"}
        ]);
        serde_json::from_value(value).expect("rows should deserialize")
    }

    #[test]
    fn test_write_creates_file_in_cache_directory() {
        let (cache, temp_dir) = create_test_cache();

        cache
            .set("api_interface.country_details", &rows(), 86400)
            .expect("Write should succeed");

        let expected_path = temp_dir.path().join("api_interface.country_details.json");
        assert!(expected_path.exists(), "Cache file should exist");

        let content = fs::read_to_string(&expected_path).expect("Should read file");
        assert!(content.contains("\"countryCode\""));
        assert!(content.contains("\"France\""));
        assert!(content.contains("\"expires_at\""));
    }

    #[test]
    fn test_get_returns_none_for_missing_key() {
        let (cache, _temp_dir) = create_test_cache();
        assert!(cache.get("nonexistent_key").is_none());
    }

    #[test]
    fn test_get_returns_fresh_payload() {
        let (cache, _temp_dir) = create_test_cache();

        cache.set("fresh_key", &rows(), 86400).expect("Write should succeed");

        assert_eq!(cache.get("fresh_key"), Some(rows()));
    }

    #[test]
    fn test_expired_entry_is_absent_but_readable_with_metadata() {
        let (cache, _temp_dir) = create_test_cache();

        // Zero TTL expires immediately
        cache.set("expired_key", &rows(), 0).expect("Write should succeed");
        thread::sleep(StdDuration::from_millis(10));

        assert!(cache.get("expired_key").is_none(), "Expired entry should read as absent");

        let raw: CachedData<Vec<RawRow>> = cache.read("expired_key").expect("Entry should still exist on disk");
        assert!(raw.is_expired);
        assert_eq!(raw.data, rows());
    }

    #[test]
    fn test_invalidate_removes_entry() {
        let (cache, temp_dir) = create_test_cache();

        cache.set("gone_key", &rows(), 86400).expect("Write should succeed");
        cache.invalidate("gone_key").expect("Invalidate should succeed");

        assert!(cache.get("gone_key").is_none());
        assert!(!temp_dir.path().join("gone_key.json").exists());
    }

    #[test]
    fn test_invalidate_missing_key_is_noop() {
        let (cache, _temp_dir) = create_test_cache();
        cache.invalidate("never_set").expect("Invalidating a missing key should succeed");
        cache.invalidate("never_set").expect("Invalidate should be idempotent");
    }

    #[test]
    fn test_write_creates_directory_if_missing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let nested_path = temp_dir.path().join("nested").join("cache").join("dir");
        let cache = CacheManager::with_dir(nested_path.clone());

        cache.set("nested_key", &rows(), 60).expect("Write should succeed");

        assert!(nested_path.exists(), "Nested directory should be created");
        assert!(nested_path.join("nested_key.json").exists(), "Cache file should exist");
    }

    #[test]
    fn test_write_leaves_no_temporary_files() {
        let (cache, temp_dir) = create_test_cache();

        cache.set("tidy_key", &rows(), 60).expect("Write should succeed");

        let names: Vec<String> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["tidy_key.json".to_string()]);
    }

    #[test]
    fn test_concurrent_writers_never_tear_the_entry() {
        let (cache, temp_dir) = create_test_cache();
        let cache = Arc::new(cache);

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    let payload: Vec<RawRow> = (0..500)
                        .map(|i| {
                            serde_json::from_value(json!({
                                "countryCode": format!("C{}-{}", t, i),
                                "countryName": "x".repeat(32)
                            }))
                            .unwrap()
                        })
                        .collect();
                    let mut failures = 0;
                    let mut torn = 0;
                    for _ in 0..25 {
                        if cache.set("shared", &payload, 60).is_err() {
                            failures += 1;
                        }
                        match cache.get("shared") {
                            Some(rows) if rows.len() == 500 => {}
                            _ => torn += 1,
                        }
                    }
                    (failures, torn)
                })
            })
            .collect();

        for handle in handles {
            let (failures, torn) = handle.join().unwrap();
            assert_eq!(failures, 0, "every write should succeed");
            assert_eq!(torn, 0, "every read should see a whole entry");
        }

        let names: Vec<String> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["shared.json".to_string()]);
    }

    #[test]
    fn test_cached_at_timestamp_is_recorded() {
        let (cache, _temp_dir) = create_test_cache();

        let before = Utc::now();
        cache.set("timestamp_key", &rows(), 60).expect("Write should succeed");
        let after = Utc::now();

        let result: CachedData<Vec<RawRow>> = cache.read("timestamp_key").expect("Should read cache");

        assert!(result.cached_at >= before, "cached_at should be after write started");
        assert!(result.cached_at <= after, "cached_at should be before write finished");
    }

    #[test]
    fn test_corrupt_file_reads_as_absent() {
        let (cache, temp_dir) = create_test_cache();
        fs::write(temp_dir.path().join("broken.json"), "not json").unwrap();

        assert!(cache.get("broken").is_none());
    }

    #[test]
    fn test_new_creates_xdg_compliant_path() {
        if let Some(cache) = CacheManager::new() {
            let path_str = cache.dir().to_string_lossy();
            assert!(
                path_str.contains("prodlist"),
                "Cache path should contain project name"
            );
        }
        // Test passes if new() returns None (e.g., no home directory in CI)
    }

    #[test]
    fn test_overwrite_replaces_entry() {
        let (cache, _temp_dir) = create_test_cache();
        let second: Vec<RawRow> = rows().into_iter().take(1).collect();

        cache.set("overwrite_key", &rows(), 60).expect("First write should succeed");
        cache.set("overwrite_key", &second, 60).expect("Second write should succeed");

        assert_eq!(cache.get("overwrite_key"), Some(second));
    }
}
