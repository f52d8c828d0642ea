//! 離線外殼示例：標記部署目錄、安裝快取，再模擬斷線

use async_trait::async_trait;
use pwa::pwa_cache::ClientId;
use pwa::{
    CacheManagerConfig, DirectoryOrigin, FetchResponse, MemoryCacheStorage, Network, PwaError,
    Registration, Request, Response, StamperConfig, VersionStamper,
};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 可切換斷線的部署目錄來源
struct SwitchableOrigin {
    inner: DirectoryOrigin,
    offline: AtomicBool,
}

impl SwitchableOrigin {
    fn new(root: &Path) -> Self {
        Self {
            inner: DirectoryOrigin::new(root),
            offline: AtomicBool::new(false),
        }
    }

    fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Network for SwitchableOrigin {
    async fn fetch(&self, request: &Request) -> pwa::pwa_core::Result<Response> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(PwaError::NetworkUnavailable(request.url.to_string()));
        }
        self.inner.fetch(request).await
    }
}

async fn show_requests(
    registration: &Registration,
    client: ClientId,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(manager) = registration.controller(client).await else {
        return Err("頁面未受控".into());
    };

    for path in ["/", "/app.js", "/health", "/about.html"] {
        let request = Request::get(path, manager.origin())?;
        let response = registration.fetch(client, request).await?;
        let source = match &response {
            FetchResponse::Cached(_) => "快取",
            FetchResponse::Network(_) => "網路",
            FetchResponse::Fallback(_) => "後備",
        };
        println!("  {path:<12} {} ({source})", response.response().status);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    println!("=== 離線外殼示例 ===\n");

    // 建立暫時的部署目錄
    let deploy = tempfile::tempdir()?;
    std::fs::write(
        deploy.path().join("index.html"),
        r#"<meta name="version" content="dev"><link href="styles.css?v=dev"><script src="app.js?v=dev"></script>"#,
    )?;
    std::fs::write(deploy.path().join("manifest.json"), r#"{"name":"EduCalc","version":"dev"}"#)?;
    std::fs::write(deploy.path().join("styles.css"), "body { margin: 0 }")?;
    std::fs::write(deploy.path().join("app.js"), "console.log('EduCalc')")?;

    // 發布：寫入新版本
    let report = VersionStamper::new(StamperConfig::new(deploy.path()))?.run()?;
    println!("{}", report.status_line());
    for target in report.skipped() {
        println!("  - 略過: {target:?}");
    }

    // 安裝並啟用
    let origin = Arc::new(SwitchableOrigin::new(deploy.path()));
    let registration = Registration::new(Arc::new(MemoryCacheStorage::new()), origin.clone());
    let activation = registration
        .register(CacheManagerConfig::new("educalc-v1"))
        .await?;
    println!("\n目前快取: {}", activation.cache_name);

    let client = registration.connect().await;

    println!("\n連線中:");
    show_requests(&registration, client).await?;

    // 斷線：外殼仍由快取提供，API 與未快取頁面回傳後備
    origin.go_offline();
    println!("\n斷線後:");
    show_requests(&registration, client).await?;

    Ok(())
}
