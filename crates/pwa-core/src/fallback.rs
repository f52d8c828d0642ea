//! 後備回應合成

use crate::RequestClass;

/// 預設離線訊息
pub const DEFAULT_OFFLINE_MESSAGE: &str = "Sin conexión a internet";

/// 服務不可用狀態碼
pub const SERVICE_UNAVAILABLE: u16 = 503;

/// 後備回應合成器
///
/// 輸出只取決於配置的訊息，同一輸入永遠得到同一回應。
#[derive(Debug, Clone)]
pub struct FallbackSynthesizer {
    offline_message: String,
}

impl FallbackSynthesizer {
    /// 創建新的合成器
    pub fn new(offline_message: impl Into<String>) -> Self {
        Self {
            offline_message: offline_message.into(),
        }
    }

    /// 依請求類別合成後備回應
    pub fn synthesize(&self, class: RequestClass) -> crate::Response {
        match class {
            RequestClass::Api => self.api_unavailable(),
            RequestClass::Static => self.offline_page(),
        }
    }

    /// API 後備：503 + 固定錯誤訊息 JSON
    pub fn api_unavailable(&self) -> crate::Response {
        let body = serde_json::json!({ "error": self.offline_message });
        crate::Response::new(SERVICE_UNAVAILABLE)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
    }

    /// 靜態資源後備：最小的離線頁面
    pub fn offline_page(&self) -> crate::Response {
        let body = format!(
            "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>Offline</title></head>\
             <body><h1>Offline</h1><p>{}</p></body></html>",
            self.offline_message
        );
        crate::Response::new(SERVICE_UNAVAILABLE)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body(body)
    }
}

impl Default for FallbackSynthesizer {
    fn default() -> Self {
        Self::new(DEFAULT_OFFLINE_MESSAGE)
    }
}
