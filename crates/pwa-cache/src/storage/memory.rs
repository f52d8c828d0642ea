//! 記憶體快取儲存

use async_trait::async_trait;
use pwa_core::{CachedEntry, Request, Response, Result};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

use super::CacheStorage;

/// 記憶體快取儲存（測試與單一工作階段使用）
#[derive(Debug, Default)]
pub struct MemoryCacheStorage {
    stores: RwLock<BTreeMap<String, HashMap<String, CachedEntry>>>,
}

impl MemoryCacheStorage {
    /// 創建空的儲存
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStorage for MemoryCacheStorage {
    async fn open(&self, name: &str) -> Result<()> {
        self.stores
            .write()
            .await
            .entry(name.to_string())
            .or_default();
        Ok(())
    }

    async fn has(&self, name: &str) -> Result<bool> {
        Ok(self.stores.read().await.contains_key(name))
    }

    async fn names(&self) -> Result<Vec<String>> {
        Ok(self.stores.read().await.keys().cloned().collect())
    }

    async fn delete(&self, name: &str) -> Result<bool> {
        Ok(self.stores.write().await.remove(name).is_some())
    }

    async fn lookup(&self, name: &str, request: &Request) -> Result<Option<Response>> {
        if !request.is_cacheable_method() {
            return Ok(None);
        }

        let stores = self.stores.read().await;
        Ok(stores
            .get(name)
            .and_then(|store| store.get(request.cache_key()))
            .map(|entry| entry.response.clone()))
    }

    async fn put(&self, name: &str, entry: CachedEntry) -> Result<()> {
        self.stores
            .write()
            .await
            .entry(name.to_string())
            .or_default()
            .insert(entry.key().to_string(), entry);
        Ok(())
    }

    async fn entry_count(&self, name: &str) -> Result<usize> {
        Ok(self
            .stores
            .read()
            .await
            .get(name)
            .map_or(0, HashMap::len))
    }
}
