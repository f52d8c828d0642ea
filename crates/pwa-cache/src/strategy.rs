//! 請求處理策略

use pwa_core::{CachedEntry, FallbackSynthesizer, Request, RequestClass, Response};

use crate::network::Network;
use crate::storage::CacheStorage;

/// 處理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// 只走網路，失敗時回傳 API 後備，永不寫入快取
    NetworkOnly,
    /// 快取優先，未命中時從網路取得並回填
    CacheFirst,
}

impl Strategy {
    /// 依請求類別選擇策略
    pub fn for_class(class: RequestClass) -> Self {
        match class {
            RequestClass::Api => Strategy::NetworkOnly,
            RequestClass::Static => Strategy::CacheFirst,
        }
    }
}

/// 攔截請求的處理結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResponse {
    /// 來自具名儲存
    Cached(Response),
    /// 轉發的網路回應
    Network(Response),
    /// 合成的後備回應
    Fallback(Response),
}

impl FetchResponse {
    pub fn response(&self) -> &Response {
        match self {
            FetchResponse::Cached(r) | FetchResponse::Network(r) | FetchResponse::Fallback(r) => r,
        }
    }

    pub fn into_response(self) -> Response {
        match self {
            FetchResponse::Cached(r) | FetchResponse::Network(r) | FetchResponse::Fallback(r) => r,
        }
    }

    pub fn is_cached(&self) -> bool {
        matches!(self, FetchResponse::Cached(_))
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, FetchResponse::Fallback(_))
    }
}

/// 只走網路
pub async fn network_only(
    network: &dyn Network,
    request: &Request,
    fallback: &FallbackSynthesizer,
) -> FetchResponse {
    match network.fetch(request).await {
        Ok(response) => FetchResponse::Network(response),
        Err(e) => {
            tracing::warn!("API 請求失敗，回傳離線回應 {}: {}", request.url, e);
            FetchResponse::Fallback(fallback.api_unavailable())
        }
    }
}

/// 快取優先並回填
///
/// 儲存讀寫失敗視同未命中；只有 2xx 的 GET 回應會寫入。
pub async fn cache_first(
    storage: &dyn CacheStorage,
    cache_name: &str,
    network: &dyn Network,
    request: &Request,
    fallback: &FallbackSynthesizer,
) -> FetchResponse {
    match storage.lookup(cache_name, request).await {
        Ok(Some(response)) => {
            tracing::debug!("快取命中: {}", request.url);
            return FetchResponse::Cached(response);
        }
        Ok(None) => tracing::debug!("快取未命中: {}", request.url),
        Err(e) => tracing::warn!("快取讀取失敗，改走網路 {}: {}", request.url, e),
    }

    match network.fetch(request).await {
        Ok(response) => {
            if response.is_success() && request.is_cacheable_method() {
                let entry = CachedEntry::new(request.clone(), response.clone());
                if let Err(e) = storage.put(cache_name, entry).await {
                    tracing::warn!("快取寫入失敗 {}: {}", request.url, e);
                }
            }
            FetchResponse::Network(response)
        }
        Err(e) => {
            tracing::warn!("靜態資源無法取得，回傳離線頁面 {}: {}", request.url, e);
            FetchResponse::Fallback(fallback.offline_page())
        }
    }
}
