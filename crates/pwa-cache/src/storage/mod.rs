//! 具名快取儲存
//!
//! 每個世代一個具名儲存，內容為（請求 → 回應）。只有 GET 條目可被匹配。

mod file;
mod memory;

pub use file::FileCacheStorage;
pub use memory::MemoryCacheStorage;

use async_trait::async_trait;
use pwa_core::{CachedEntry, Request, Response, Result};

/// 快取儲存後端
///
/// 同一鍵的並行寫入以最後寫入者為準。
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// 開啟（不存在則建立）具名儲存
    async fn open(&self, name: &str) -> Result<()>;

    /// 儲存是否存在
    async fn has(&self, name: &str) -> Result<bool>;

    /// 所有儲存名稱（已排序）
    async fn names(&self) -> Result<Vec<String>>;

    /// 刪除儲存，回傳是否確實存在
    async fn delete(&self, name: &str) -> Result<bool>;

    /// 查詢條目
    async fn lookup(&self, name: &str, request: &Request) -> Result<Option<Response>>;

    /// 寫入條目（儲存不存在時建立）
    async fn put(&self, name: &str, entry: CachedEntry) -> Result<()>;

    /// 儲存內的條目數量
    async fn entry_count(&self, name: &str) -> Result<usize>;

    /// 批次寫入
    async fn put_all(&self, name: &str, entries: Vec<CachedEntry>) -> Result<()> {
        for entry in entries {
            self.put(name, entry).await?;
        }
        Ok(())
    }
}
