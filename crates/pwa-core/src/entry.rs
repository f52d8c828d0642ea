//! 快取條目模型

use chrono::{DateTime, Utc};

use crate::{Request, Response};

/// 已儲存的（請求，回應）組合
///
/// 存在即代表可重用，沒有 TTL 或新鮮度檢查。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedEntry {
    /// 原始請求
    pub request: Request,

    /// 儲存的回應
    pub response: Response,

    /// 寫入時間（僅供記錄）
    pub stored_at: DateTime<Utc>,
}

impl CachedEntry {
    /// 創建新的快取條目
    pub fn new(request: Request, response: Response) -> Self {
        Self {
            request,
            response,
            stored_at: Utc::now(),
        }
    }

    /// 快取鍵
    pub fn key(&self) -> &str {
        self.request.cache_key()
    }
}
