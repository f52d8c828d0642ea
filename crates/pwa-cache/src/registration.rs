//! 宿主轉接層：每個來源一個註冊
//!
//! 追蹤目前世代與各頁面的控制者，並把安裝、啟用、請求事件派發給
//! 對應的快取管理器。

use pwa_core::{CacheManagerConfig, Request, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::manager::{ActivationReport, CacheManager};
use crate::network::Network;
use crate::storage::CacheStorage;
use crate::strategy::FetchResponse;

/// 頁面識別
pub type ClientId = Uuid;

/// 來源註冊
pub struct Registration {
    storage: Arc<dyn CacheStorage>,
    network: Arc<dyn Network>,
    active: RwLock<Option<Arc<CacheManager>>>,
    clients: RwLock<HashMap<ClientId, Option<Arc<CacheManager>>>>,
}

impl Registration {
    /// 創建新的註冊
    pub fn new(storage: Arc<dyn CacheStorage>, network: Arc<dyn Network>) -> Self {
        Self {
            storage,
            network,
            active: RwLock::new(None),
            clients: RwLock::new(HashMap::new()),
        }
    }

    /// 目前的世代
    pub async fn active(&self) -> Option<Arc<CacheManager>> {
        self.active.read().await.clone()
    }

    /// 安裝並啟用新世代
    ///
    /// 安裝失敗時回傳錯誤，原世代繼續服務。成功後舊世代標記為
    /// 已取代，所有頁面改由新世代控制。
    pub async fn register(&self, config: CacheManagerConfig) -> Result<ActivationReport> {
        let manager = Arc::new(CacheManager::new(
            config,
            self.storage.clone(),
            self.network.clone(),
        )?);

        // 安裝成功時管理器已要求立即啟用，不等待舊頁面關閉
        manager.on_install().await?;
        debug_assert!(manager.skip_waiting_requested());

        let previous = self.active.read().await.clone();
        let report = manager.on_activate().await?;

        if let Some(previous) = previous {
            if let Err(e) = previous.mark_replaced().await {
                tracing::warn!("無法標記舊世代 {}: {}", previous.cache_name(), e);
            }
        }

        *self.active.write().await = Some(manager.clone());
        let claimed = self.claim(&manager).await;
        tracing::info!("{} 接管 {} 個頁面", manager.cache_name(), claimed);

        Ok(report)
    }

    /// 讓所有頁面改由指定世代控制，不需重新載入
    async fn claim(&self, manager: &Arc<CacheManager>) -> usize {
        let mut clients = self.clients.write().await;
        for controller in clients.values_mut() {
            *controller = Some(manager.clone());
        }
        clients.len()
    }

    /// 新頁面載入，由目前世代控制（若有）
    pub async fn connect(&self) -> ClientId {
        let id = Uuid::new_v4();
        let controller = self.active().await;
        self.clients.write().await.insert(id, controller);
        id
    }

    /// 頁面關閉
    pub async fn disconnect(&self, client: ClientId) {
        self.clients.write().await.remove(&client);
    }

    /// 頁面目前的控制者
    pub async fn controller(&self, client: ClientId) -> Option<Arc<CacheManager>> {
        self.clients.read().await.get(&client).cloned().flatten()
    }

    /// 派發頁面發出的請求
    ///
    /// 未受控的頁面直接走網路。
    pub async fn fetch(&self, client: ClientId, request: Request) -> Result<FetchResponse> {
        match self.controller(client).await {
            Some(manager) => Ok(manager.on_fetch(request).await),
            None => self
                .network
                .fetch(&request)
                .await
                .map(FetchResponse::Network),
        }
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::LifecycleState;
    use crate::storage::MemoryCacheStorage;
    use async_trait::async_trait;
    use pwa_core::{PwaError, Response};
    use std::sync::atomic::{AtomicBool, Ordering};
    use url::Url;

    /// 可切換離線並可讓單一路徑失敗的網路
    #[derive(Default)]
    struct ToggleNetwork {
        offline: AtomicBool,
        broken_path: std::sync::Mutex<Option<String>>,
    }

    impl ToggleNetwork {
        fn set_offline(&self, offline: bool) {
            self.offline.store(offline, Ordering::SeqCst);
        }

        fn break_path(&self, path: &str) {
            *self.broken_path.lock().unwrap() = Some(path.to_string());
        }
    }

    #[async_trait]
    impl Network for ToggleNetwork {
        async fn fetch(&self, request: &Request) -> Result<Response> {
            let broken = self.broken_path.lock().unwrap().clone();
            if self.offline.load(Ordering::SeqCst) || broken.as_deref() == Some(request.path()) {
                return Err(PwaError::NetworkUnavailable(request.url.to_string()));
            }
            Ok(Response::new(200).with_body(request.path().to_string()))
        }
    }

    fn setup() -> (Registration, Arc<MemoryCacheStorage>, Arc<ToggleNetwork>) {
        let storage = Arc::new(MemoryCacheStorage::new());
        let network = Arc::new(ToggleNetwork::default());
        let registration = Registration::new(storage.clone(), network.clone());
        (registration, storage, network)
    }

    fn get(raw: &str) -> Request {
        let origin = Url::parse("http://localhost:8080/").unwrap();
        Request::get(raw, &origin).unwrap()
    }

    #[tokio::test]
    async fn test_uncontrolled_page_goes_to_network() {
        let (registration, _, network) = setup();
        let client = registration.connect().await;

        let response = registration.fetch(client, get("/index.html")).await.unwrap();
        assert!(matches!(response, FetchResponse::Network(_)));

        network.set_offline(true);
        assert!(registration.fetch(client, get("/index.html")).await.is_err());
    }

    #[tokio::test]
    async fn test_new_generation_claims_existing_pages() {
        let (registration, storage, _) = setup();
        registration
            .register(CacheManagerConfig::new("educalc-v1"))
            .await
            .unwrap();
        let client = registration.connect().await;
        let v1 = registration.controller(client).await.unwrap();

        let report = registration
            .register(CacheManagerConfig::new("educalc-v2"))
            .await
            .unwrap();

        assert_eq!(report.deleted, vec!["educalc-v1"]);
        assert_eq!(storage.names().await.unwrap(), vec!["educalc-v2"]);
        assert_eq!(v1.state().await, LifecycleState::Replaced);

        let controller = registration.controller(client).await.unwrap();
        assert_eq!(controller.cache_name(), "educalc-v2");
        assert_eq!(controller.state().await, LifecycleState::Active);
    }

    #[tokio::test]
    async fn test_failed_install_keeps_previous_generation() {
        let (registration, storage, network) = setup();
        registration
            .register(CacheManagerConfig::new("educalc-v1"))
            .await
            .unwrap();
        let client = registration.connect().await;

        network.break_path("/app.js");
        let err = registration
            .register(CacheManagerConfig::new("educalc-v2"))
            .await
            .unwrap_err();

        assert!(matches!(err, PwaError::PrecacheFailed { .. }));
        assert_eq!(storage.names().await.unwrap(), vec!["educalc-v1"]);
        let active = registration.active().await.unwrap();
        assert_eq!(active.cache_name(), "educalc-v1");
        assert_eq!(active.state().await, LifecycleState::Active);

        // 舊世代仍從快取提供外殼
        network.set_offline(true);
        let response = registration.fetch(client, get("/app.js")).await.unwrap();
        assert!(response.is_cached());
    }

    #[tokio::test]
    async fn test_replaced_generation_finishes_inflight_requests() {
        let (registration, _, _) = setup();
        registration
            .register(CacheManagerConfig::new("educalc-v1"))
            .await
            .unwrap();
        let old = registration.active().await.unwrap();

        registration
            .register(CacheManagerConfig::new("educalc-v2"))
            .await
            .unwrap();

        // 持有舊世代的請求仍會完成
        let response = old.fetch_path("/styles.css").await.unwrap();
        assert_eq!(response.response().status, 200);
    }

    #[tokio::test]
    async fn test_disconnect() {
        let (registration, _, _) = setup();
        registration
            .register(CacheManagerConfig::new("educalc-v1"))
            .await
            .unwrap();
        let client = registration.connect().await;

        assert!(registration.controller(client).await.is_some());
        registration.disconnect(client).await;
        assert!(registration.controller(client).await.is_none());
    }
}
