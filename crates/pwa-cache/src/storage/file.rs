//! 檔案系統快取儲存
//!
//! ```text
//! {root}/{name}-{hash8}/
//!   store.json          # 儲存名稱
//!   {sha256}.entry      # 一行 JSON 中繼資料 + 換行 + 回應主體
//! ```
//!
//! 每個條目是單一檔案，經由唯一命名的暫存檔再 rename 寫入，
//! 讀取端只會看到完整的舊條目或完整的新條目。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pwa_core::{CachedEntry, PwaError, Request, Response, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use super::CacheStorage;

const STORE_MARKER: &str = "store.json";
const ENTRY_EXTENSION: &str = "entry";

#[derive(Debug, Serialize, Deserialize)]
struct StoreMarker {
    name: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct EntryMeta {
    url: String,
    status: u16,
    headers: BTreeMap<String, String>,
    stored_at: DateTime<Utc>,
}

/// 跨工作階段保存的快取儲存
#[derive(Debug, Clone)]
pub struct FileCacheStorage {
    root: PathBuf,
}

impl FileCacheStorage {
    /// 以指定根目錄建立
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn store_dir(&self, name: &str) -> PathBuf {
        let readable: String = name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        let digest = hex::encode(Sha256::digest(name.as_bytes()));
        self.root.join(format!("{readable}-{}", &digest[..8]))
    }

    fn entry_path(dir: &Path, key: &str) -> PathBuf {
        let stem = hex::encode(Sha256::digest(key.as_bytes()));
        dir.join(format!("{stem}.{ENTRY_EXTENSION}"))
    }
}

fn store_error(path: &Path, e: impl std::fmt::Display) -> PwaError {
    PwaError::StoreUnavailable(format!("{}: {e}", path.display()))
}

/// 寫入唯一命名的暫存檔後 rename，同一目標的並行寫入互不干擾
async fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let mut temp_path = path.as_os_str().to_owned();
    temp_path.push(format!(".{}.tmp", Uuid::new_v4().simple()));
    let temp_path = PathBuf::from(temp_path);

    fs::write(&temp_path, content)
        .await
        .map_err(|e| store_error(&temp_path, e))?;
    if let Err(e) = fs::rename(&temp_path, path).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(store_error(path, e));
    }
    Ok(())
}

fn encode_entry(meta: &EntryMeta, body: &[u8], path: &Path) -> Result<Vec<u8>> {
    // 單行 JSON 不含換行，以第一個換行切分中繼資料與主體
    let mut bytes = serde_json::to_vec(meta).map_err(|e| store_error(path, e))?;
    bytes.push(b'\n');
    bytes.extend_from_slice(body);
    Ok(bytes)
}

fn decode_entry(raw: &[u8], path: &Path) -> Result<(EntryMeta, Vec<u8>)> {
    let split = raw
        .iter()
        .position(|&b| b == b'\n')
        .ok_or_else(|| store_error(path, "條目缺少中繼資料"))?;
    let meta = serde_json::from_slice(&raw[..split]).map_err(|e| store_error(path, e))?;
    Ok((meta, raw[split + 1..].to_vec()))
}

#[async_trait]
impl CacheStorage for FileCacheStorage {
    async fn open(&self, name: &str) -> Result<()> {
        let dir = self.store_dir(name);
        let marker_path = dir.join(STORE_MARKER);
        if fs::try_exists(&marker_path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::create_dir_all(&dir)
            .await
            .map_err(|e| store_error(&dir, e))?;

        let marker = StoreMarker {
            name: name.to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_vec_pretty(&marker).map_err(|e| store_error(&marker_path, e))?;
        write_atomic(&marker_path, &json).await?;

        tracing::debug!("建立快取儲存: {} ({})", name, dir.display());
        Ok(())
    }

    async fn has(&self, name: &str) -> Result<bool> {
        let marker_path = self.store_dir(name).join(STORE_MARKER);
        fs::try_exists(&marker_path)
            .await
            .map_err(|e| store_error(&marker_path, e))
    }

    async fn names(&self) -> Result<Vec<String>> {
        let mut dir = match fs::read_dir(&self.root).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(store_error(&self.root, e)),
        };

        let mut names = Vec::new();
        while let Some(child) = dir
            .next_entry()
            .await
            .map_err(|e| store_error(&self.root, e))?
        {
            let marker_path = child.path().join(STORE_MARKER);
            let Ok(raw) = fs::read(&marker_path).await else {
                continue;
            };
            match serde_json::from_slice::<StoreMarker>(&raw) {
                Ok(marker) => names.push(marker.name),
                Err(e) => tracing::warn!("略過損壞的儲存標記 {}: {}", marker_path.display(), e),
            }
        }

        names.sort();
        Ok(names)
    }

    async fn delete(&self, name: &str) -> Result<bool> {
        let dir = self.store_dir(name);
        match fs::remove_dir_all(&dir).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(store_error(&dir, e)),
        }
    }

    async fn lookup(&self, name: &str, request: &Request) -> Result<Option<Response>> {
        if !request.is_cacheable_method() {
            return Ok(None);
        }

        let path = Self::entry_path(&self.store_dir(name), request.cache_key());
        let raw = match fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(store_error(&path, e)),
        };
        let (meta, body) = decode_entry(&raw, &path)?;

        Ok(Some(Response {
            status: meta.status,
            headers: meta.headers,
            body,
        }))
    }

    async fn put(&self, name: &str, entry: CachedEntry) -> Result<()> {
        self.open(name).await?;

        let path = Self::entry_path(&self.store_dir(name), entry.key());
        let meta = EntryMeta {
            url: entry.key().to_string(),
            status: entry.response.status,
            headers: entry.response.headers.clone(),
            stored_at: entry.stored_at,
        };
        let bytes = encode_entry(&meta, &entry.response.body, &path)?;
        write_atomic(&path, &bytes).await?;

        tracing::debug!("已快取 {} -> {}", meta.url, name);
        Ok(())
    }

    async fn entry_count(&self, name: &str) -> Result<usize> {
        let dir = self.store_dir(name);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(store_error(&dir, e)),
        };

        let mut count = 0;
        while let Some(child) = entries
            .next_entry()
            .await
            .map_err(|e| store_error(&dir, e))?
        {
            if child
                .path()
                .extension()
                .is_some_and(|ext| ext == ENTRY_EXTENSION)
            {
                count += 1;
            }
        }
        Ok(count)
    }
}
