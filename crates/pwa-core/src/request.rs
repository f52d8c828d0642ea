//! 攔截請求模型

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::{PwaError, Result};

/// HTTP 方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Options,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 攔截到的請求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// HTTP 方法
    pub method: Method,

    /// 絕對 URL（已相對於來源解析，不含片段）
    pub url: Url,

    /// 請求主體（API 呼叫使用）
    pub body: Option<Vec<u8>>,
}

impl Request {
    /// 創建新的請求
    pub fn new(method: Method, mut url: Url) -> Self {
        url.set_fragment(None);
        Self {
            method,
            url,
            body: None,
        }
    }

    /// 以來源為基準解析 URL（支援 `/app.js` 這類根相對路徑）
    pub fn parse(method: Method, raw: &str, origin: &Url) -> Result<Self> {
        let url = origin
            .join(raw)
            .map_err(|e| PwaError::InvalidUrl(format!("{raw}: {e}")))?;
        Ok(Self::new(method, url))
    }

    /// 建立 GET 請求
    pub fn get(raw: &str, origin: &Url) -> Result<Self> {
        Self::parse(Method::Get, raw, origin)
    }

    /// 建構器模式：設置請求主體
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// 請求路徑
    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// 快取鍵（完整 URL，含查詢字串）
    pub fn cache_key(&self) -> &str {
        self.url.as_str()
    }

    /// 只有 GET 請求可寫入快取
    pub fn is_cacheable_method(&self) -> bool {
        self.method == Method::Get
    }
}
