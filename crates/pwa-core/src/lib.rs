//! # PWA Core
//!
//! 核心資料模型與類型定義：版本標記、請求/回應值物件、分類器與後備回應

pub mod classify;
pub mod config;
pub mod entry;
pub mod fallback;
pub mod mime;
pub mod request;
pub mod response;
pub mod version;

// Re-export 主要類型
pub use classify::{classify, RequestClass};
pub use config::{CacheManagerConfig, StamperConfig};
pub use entry::CachedEntry;
pub use fallback::FallbackSynthesizer;
pub use request::{Method, Request};
pub use response::Response;
pub use version::ReleaseVersion;

use std::path::PathBuf;

/// PWA 錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum PwaError {
    #[error("找不到必要的部署檔案: {}", .0.display())]
    MissingArtifact(PathBuf),

    #[error("無效的 manifest {}: {reason}", .path.display())]
    InvalidManifest { path: PathBuf, reason: String },

    #[error("檔案讀寫錯誤 {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("預快取失敗 {url}: {reason}")]
    PrecacheFailed { url: String, reason: String },

    #[error("網路不可用: {0}")]
    NetworkUnavailable(String),

    #[error("快取儲存不可用: {0}")]
    StoreUnavailable(String),

    #[error("無效的 URL: {0}")]
    InvalidUrl(String),

    #[error("無效的配置: {0}")]
    InvalidConfig(String),

    #[error("生命週期狀態錯誤: {0}")]
    InvalidState(String),
}

impl PwaError {
    /// 包裝 I/O 錯誤並附上路徑
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// 命令列結束碼
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MissingArtifact(_) | Self::InvalidConfig(_) | Self::InvalidUrl(_) => 1,
            Self::InvalidManifest { .. } => 2,
            Self::Io { .. } => 3,
            Self::PrecacheFailed { .. }
            | Self::NetworkUnavailable(_)
            | Self::StoreUnavailable(_)
            | Self::InvalidState(_) => 4,
        }
    }
}

pub type Result<T> = std::result::Result<T, PwaError>;
