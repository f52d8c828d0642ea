//! 請求分類器

use serde::{Deserialize, Serialize};

use crate::Request;

/// 請求處理類別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestClass {
    /// 後端運算服務（只走網路，永不快取）
    Api,
    /// 其他所有資源（快取優先）
    Static,
}

/// 依路徑將請求分類
///
/// 路徑等於某個 API 路徑，或位於其下（`/calculate/...`）即為 API。
pub fn classify<S: AsRef<str>>(request: &Request, api_paths: &[S]) -> RequestClass {
    let path = request.path();
    let is_api = api_paths.iter().any(|api| {
        let api = api.as_ref().trim_end_matches('/');
        !api.is_empty()
            && path
                .strip_prefix(api)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    });

    if is_api {
        RequestClass::Api
    } else {
        RequestClass::Static
    }
}
