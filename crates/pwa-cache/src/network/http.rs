//! reqwest HTTP 傳輸

use async_trait::async_trait;
use pwa_core::{Method, PwaError, Request, Response, Result};

use super::Network;

/// 透過 HTTP 取得資源
#[derive(Debug, Clone, Default)]
pub struct HttpNetwork {
    client: reqwest::Client,
}

impl HttpNetwork {
    /// 使用預設的 reqwest 客戶端（逾時沿用傳輸層預設）
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用自訂客戶端
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Head => reqwest::Method::HEAD,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
        Method::Options => reqwest::Method::OPTIONS,
    }
}

#[async_trait]
impl Network for HttpNetwork {
    async fn fetch(&self, request: &Request) -> Result<Response> {
        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), request.url.clone());
        if let Some(body) = &request.body {
            builder = builder
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body.clone());
        }

        let upstream = builder
            .send()
            .await
            .map_err(|e| PwaError::NetworkUnavailable(format!("{}: {e}", request.url)))?;

        let mut response = Response::new(upstream.status().as_u16());
        for (name, value) in upstream.headers() {
            if let Ok(value) = value.to_str() {
                response = response.with_header(name.as_str(), value);
            }
        }

        let body = upstream
            .bytes()
            .await
            .map_err(|e| PwaError::NetworkUnavailable(format!("{}: {e}", request.url)))?;
        Ok(response.with_body(body.to_vec()))
    }
}
