//! # PWA
//!
//! 可安裝、可離線使用的網頁客戶端：發布時的版本標記與執行期的資源快取管理

pub use pwa_cache;
pub use pwa_core;
pub use pwa_stamp;

// Re-export 主要類型
pub use pwa_cache::{
    CacheManager, CacheStorage, DirectoryOrigin, FetchResponse, FileCacheStorage, HttpNetwork,
    LifecycleState, MemoryCacheStorage, Network, Registration,
};
pub use pwa_core::{
    classify, CacheManagerConfig, FallbackSynthesizer, PwaError, ReleaseVersion, Request,
    RequestClass, Response, StamperConfig,
};
pub use pwa_stamp::{StampReport, VersionStamper};
