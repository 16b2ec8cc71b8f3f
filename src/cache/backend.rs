//! Cache backend implementations.

use super::key::CacheKey;
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Storage capability used by the cache manager.
///
/// `set` receives an absolute expiry; a backend must never return an entry
/// whose expiry has passed.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get(&self, key: &CacheKey) -> Result<Option<Vec<u8>>>;
    async fn set(&self, key: &CacheKey, value: &[u8], expires_at: SystemTime) -> Result<()>;
    async fn delete(&self, key: &CacheKey) -> Result<bool>;
    async fn clear(&self) -> Result<()>;
    async fn len(&self) -> Result<usize>;
    fn name(&self) -> &'static str;
}

fn is_expired(expires_at: SystemTime) -> bool {
    SystemTime::now() >= expires_at
}

struct MemoryEntry {
    data: Vec<u8>,
    expires_at: SystemTime,
}

/// In-process LRU cache bounded to `max_entries`.
pub struct MemoryCache {
    entries: Mutex<LruCache<String, MemoryEntry>>,
}

impl MemoryCache {
    pub fn new(max_entries: usize) -> Self {
        let cap = NonZeroUsize::new(max_entries.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(cap)),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, LruCache<String, MemoryEntry>>> {
        self.entries.lock().map_err(|e| {
            Error::cache_with_context(
                format!("memory cache lock poisoned: {}", e),
                ErrorContext::new().with_source("memory_cache"),
            )
        })
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(1000)
    }
}

#[async_trait]
impl CacheBackend for MemoryCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<Vec<u8>>> {
        let mut entries = self.lock()?;
        let expired = match entries.get(key.as_str()) {
            Some(entry) if !is_expired(entry.expires_at) => return Ok(Some(entry.data.clone())),
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.pop(key.as_str());
        }
        Ok(None)
    }

    async fn set(&self, key: &CacheKey, value: &[u8], expires_at: SystemTime) -> Result<()> {
        self.lock()?.put(
            key.as_str().to_string(),
            MemoryEntry {
                data: value.to_vec(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &CacheKey) -> Result<bool> {
        Ok(self.lock()?.pop(key.as_str()).is_some())
    }

    async fn clear(&self) -> Result<()> {
        self.lock()?.clear();
        Ok(())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self
            .lock()?
            .iter()
            .filter(|(_, e)| !is_expired(e.expires_at))
            .count())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// Disables caching: every lookup misses, every write is dropped.
pub struct NullCache;

impl NullCache {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheBackend for NullCache {
    async fn get(&self, _: &CacheKey) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }
    async fn set(&self, _: &CacheKey, _: &[u8], _: SystemTime) -> Result<()> {
        Ok(())
    }
    async fn delete(&self, _: &CacheKey) -> Result<bool> {
        Ok(false)
    }
    async fn clear(&self) -> Result<()> {
        Ok(())
    }
    async fn len(&self) -> Result<usize> {
        Ok(0)
    }
    fn name(&self) -> &'static str {
        "null"
    }
}

#[derive(Serialize, Deserialize)]
struct FileEntry {
    key: String,
    expires_at_ms: u64,
    data: String,
}

/// One JSON file per key under a directory; file names are key digests.
///
/// Survives process restarts, so several short-lived tools can share lookups.
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.digest()))
    }

    async fn read_entry(path: &Path) -> Result<Option<FileEntry>> {
        match tokio::fs::read(path).await {
            Ok(raw) => Ok(serde_json::from_slice(&raw).ok()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn entry_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let mut dir = match tokio::fs::read_dir(&self.dir).await {
            Ok(d) => d,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(files),
            Err(e) => return Err(e.into()),
        };
        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                files.push(path);
            }
        }
        Ok(files)
    }
}

static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Per-writer temp file next to `path`, unique across processes and tasks.
fn temp_path(path: &Path) -> PathBuf {
    let seq = TMP_SEQ.fetch_add(1, Ordering::Relaxed);
    path.with_extension(format!("{}.{}.tmp", std::process::id(), seq))
}

fn to_millis(t: SystemTime) -> u64 {
    t.duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn from_millis(ms: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_millis(ms)
}

#[async_trait]
impl CacheBackend for FileCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<Vec<u8>>> {
        let path = self.entry_path(key);
        let entry = match Self::read_entry(&path).await? {
            // Digest collision or foreign file: treat as a miss.
            Some(e) if e.key == key.as_str() => e,
            _ => return Ok(None),
        };
        if is_expired(from_millis(entry.expires_at_ms)) {
            let _ = tokio::fs::remove_file(&path).await;
            return Ok(None);
        }
        match STANDARD.decode(entry.data) {
            Ok(data) => Ok(Some(data)),
            Err(_) => Ok(None),
        }
    }

    async fn set(&self, key: &CacheKey, value: &[u8], expires_at: SystemTime) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            Error::cache_with_context(
                format!("cannot create cache directory: {}", e),
                ErrorContext::new()
                    .with_field_path(self.dir.display().to_string())
                    .with_source("file_cache"),
            )
        })?;
        let entry = FileEntry {
            key: key.as_str().to_string(),
            expires_at_ms: to_millis(expires_at),
            data: STANDARD.encode(value),
        };
        let raw = serde_json::to_vec(&entry)?;
        // Write-then-rename keeps readers from seeing a half-written file.
        let path = self.entry_path(key);
        let tmp = temp_path(&path);
        tokio::fs::write(&tmp, raw).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }

    async fn delete(&self, key: &CacheKey) -> Result<bool> {
        match tokio::fs::remove_file(self.entry_path(key)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn clear(&self) -> Result<()> {
        for path in self.entry_files().await? {
            tokio::fs::remove_file(path).await?;
        }
        Ok(())
    }

    async fn len(&self) -> Result<usize> {
        let mut live = 0;
        for path in self.entry_files().await? {
            if let Some(entry) = Self::read_entry(&path).await? {
                if !is_expired(from_millis(entry.expires_at_ms)) {
                    live += 1;
                }
            }
        }
        Ok(live)
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
