//! 快取管理器（單一世代）

use pwa_core::{
    classify, CacheManagerConfig, CachedEntry, FallbackSynthesizer, PwaError, Request, Result,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use url::Url;

use crate::lifecycle::LifecycleState;
use crate::network::Network;
use crate::storage::CacheStorage;
use crate::strategy::{self, FetchResponse, Strategy};

/// 啟用結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationReport {
    /// 目前世代的儲存名稱
    pub cache_name: String,

    /// 被刪除的舊世代儲存
    pub deleted: Vec<String>,
}

/// 快取管理器
///
/// 一個實例對應一個世代。安裝、啟用依序進行；請求處理可並行，
/// 彼此之間沒有順序保證。
pub struct CacheManager {
    config: CacheManagerConfig,
    origin: Url,
    storage: Arc<dyn CacheStorage>,
    network: Arc<dyn Network>,
    fallback: FallbackSynthesizer,
    state: RwLock<LifecycleState>,
    skip_waiting: AtomicBool,
}

impl CacheManager {
    /// 創建新的快取管理器
    pub fn new(
        config: CacheManagerConfig,
        storage: Arc<dyn CacheStorage>,
        network: Arc<dyn Network>,
    ) -> Result<Self> {
        config.validate()?;
        let origin = config.origin_url()?;
        let fallback = FallbackSynthesizer::new(config.offline_message.clone());

        Ok(Self {
            config,
            origin,
            storage,
            network,
            fallback,
            state: RwLock::new(LifecycleState::Unregistered),
            skip_waiting: AtomicBool::new(false),
        })
    }

    pub fn config(&self) -> &CacheManagerConfig {
        &self.config
    }

    /// 本世代的儲存名稱
    pub fn cache_name(&self) -> &str {
        &self.config.cache_name
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// 目前狀態
    pub async fn state(&self) -> LifecycleState {
        *self.state.read().await
    }

    /// 安裝成功後是否要求立即啟用
    pub fn skip_waiting_requested(&self) -> bool {
        self.skip_waiting.load(Ordering::SeqCst)
    }

    async fn transition(&self, next: LifecycleState) -> Result<()> {
        let mut state = self.state.write().await;
        if !state.can_transition_to(next) {
            return Err(PwaError::InvalidState(format!(
                "{}: {} -> {}",
                self.config.cache_name, *state, next
            )));
        }
        tracing::debug!("{}: {} -> {}", self.config.cache_name, *state, next);
        *state = next;
        Ok(())
    }

    /// INSTALL：預快取應用外殼
    ///
    /// 任一項目失敗則整個安裝失敗，且不留下部分填充的儲存。
    pub async fn on_install(&self) -> Result<usize> {
        self.transition(LifecycleState::Installing).await?;
        tracing::info!(
            "開始安裝 {}：預快取 {} 個項目",
            self.config.cache_name,
            self.config.precache.len()
        );

        match self.precache().await {
            Ok(count) => {
                self.transition(LifecycleState::Installed).await?;
                self.skip_waiting.store(true, Ordering::SeqCst);
                tracing::info!("安裝完成 {}：已快取 {} 個項目", self.config.cache_name, count);
                Ok(count)
            }
            Err(e) => {
                tracing::warn!("安裝失敗 {}: {}", self.config.cache_name, e);
                self.transition(LifecycleState::Redundant).await?;
                Err(e)
            }
        }
    }

    async fn precache(&self) -> Result<usize> {
        // Step 1: 全部取得後才寫入
        let mut entries = Vec::with_capacity(self.config.precache.len());
        for raw in &self.config.precache {
            let request = Request::get(raw, &self.origin)?;
            let response = self
                .network
                .fetch(&request)
                .await
                .map_err(|e| PwaError::PrecacheFailed {
                    url: raw.clone(),
                    reason: e.to_string(),
                })?;
            if !response.is_success() {
                return Err(PwaError::PrecacheFailed {
                    url: raw.clone(),
                    reason: format!("HTTP {}", response.status),
                });
            }
            entries.push(CachedEntry::new(request, response));
        }

        // Step 2: 寫入儲存，失敗時移除本次新建的儲存
        let name = &self.config.cache_name;
        let existed = self.storage.has(name).await.unwrap_or(false);
        let count = entries.len();
        let written = async {
            self.storage.open(name).await?;
            self.storage.put_all(name, entries).await
        }
        .await;

        if let Err(e) = written {
            if !existed {
                if let Err(cleanup) = self.storage.delete(name).await {
                    tracing::warn!("無法移除未完成的儲存 {}: {}", name, cleanup);
                }
            }
            return Err(e);
        }

        Ok(count)
    }

    /// ACTIVATE：刪除所有非目前世代的儲存
    pub async fn on_activate(&self) -> Result<ActivationReport> {
        self.transition(LifecycleState::Activating).await?;

        let name = &self.config.cache_name;
        let mut deleted = Vec::new();
        for existing in self.storage.names().await? {
            if existing != *name {
                self.storage.delete(&existing).await?;
                tracing::info!("刪除舊快取: {}", existing);
                deleted.push(existing);
            }
        }

        self.transition(LifecycleState::Active).await?;
        tracing::info!("{} 已啟用，刪除 {} 個舊快取", name, deleted.len());

        Ok(ActivationReport {
            cache_name: name.clone(),
            deleted,
        })
    }

    /// 被新世代取代
    pub async fn mark_replaced(&self) -> Result<()> {
        self.transition(LifecycleState::Replaced).await
    }

    /// FETCH：分類後執行對應策略
    ///
    /// 尚未啟用（或安裝失敗）的世代不碰儲存，直接轉發到網路。
    pub async fn on_fetch(&self, request: Request) -> FetchResponse {
        let class = classify(&request, &self.config.api_paths);

        let state = self.state().await;
        if !state.handles_fetches() {
            tracing::debug!(
                "{} 狀態為 {}，直接轉發 {}",
                self.config.cache_name,
                state,
                request.url
            );
            return match self.network.fetch(&request).await {
                Ok(response) => FetchResponse::Network(response),
                Err(e) => {
                    tracing::warn!("轉發失敗 {}: {}", request.url, e);
                    FetchResponse::Fallback(self.fallback.synthesize(class))
                }
            };
        }

        let strategy = Strategy::for_class(class);
        tracing::debug!("{} {} -> {:?}", request.method, request.url, strategy);

        match strategy {
            Strategy::NetworkOnly => {
                strategy::network_only(self.network.as_ref(), &request, &self.fallback).await
            }
            Strategy::CacheFirst => {
                strategy::cache_first(
                    self.storage.as_ref(),
                    &self.config.cache_name,
                    self.network.as_ref(),
                    &request,
                    &self.fallback,
                )
                .await
            }
        }
    }

    /// 以根相對路徑發出 GET（便於宿主與測試使用）
    pub async fn fetch_path(&self, raw: &str) -> Result<FetchResponse> {
        let request = Request::get(raw, &self.origin)?;
        Ok(self.on_fetch(request).await)
    }
}

impl std::fmt::Debug for CacheManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheManager")
            .field("cache_name", &self.config.cache_name)
            .field("origin", &self.origin.as_str())
            .finish_non_exhaustive()
    }
}
