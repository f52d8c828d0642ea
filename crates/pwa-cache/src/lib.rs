//! # PWA Cache
//!
//! 執行期資源快取管理器：世代化的快取儲存、請求策略與生命週期

pub mod lifecycle;
pub mod manager;
pub mod network;
pub mod registration;
pub mod storage;
pub mod strategy;

// Re-export 主要類型
pub use lifecycle::LifecycleState;
pub use manager::{ActivationReport, CacheManager};
pub use network::{DirectoryOrigin, HttpNetwork, Network};
pub use registration::{ClientId, Registration};
pub use storage::{CacheStorage, FileCacheStorage, MemoryCacheStorage};
pub use strategy::{FetchResponse, Strategy};
