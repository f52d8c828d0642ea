//! 網路傳輸

mod directory;
mod http;

pub use directory::DirectoryOrigin;
pub use http::HttpNetwork;

use async_trait::async_trait;
use pwa_core::{Request, Response, Result};

/// 網路傳輸
///
/// 任何非 HTTP 層的失敗（連線、逾時）都回傳 `PwaError::NetworkUnavailable`；
/// 4xx/5xx 是正常回應。
#[async_trait]
pub trait Network: Send + Sync {
    async fn fetch(&self, request: &Request) -> Result<Response>;
}
