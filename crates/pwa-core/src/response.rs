//! 回應模型

use std::collections::BTreeMap;

/// HTTP 回應（值物件）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// 狀態碼
    pub status: u16,

    /// 標頭（名稱一律小寫）
    pub headers: BTreeMap<String, String>,

    /// 主體
    pub body: Vec<u8>,
}

impl Response {
    /// 創建新的回應
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body: Vec::new(),
        }
    }

    /// 建構器模式：設置標頭
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// 建構器模式：設置主體
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// 取得標頭
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// 是否為成功回應（2xx）
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 以 UTF-8 讀取主體
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(200, true)]
    #[case(204, true)]
    #[case(304, false)]
    #[case(404, false)]
    #[case(503, false)]
    fn test_is_success(#[case] status: u16, #[case] expected: bool) {
        assert_eq!(Response::new(status).is_success(), expected);
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let response = Response::new(200).with_header("Content-Type", "text/css");
        assert_eq!(response.header("content-type"), Some("text/css"));
        assert_eq!(response.header("CONTENT-TYPE"), Some("text/css"));
    }

    #[test]
    fn test_text_body() {
        let response = Response::new(200).with_body("body { }");
        assert_eq!(response.text(), "body { }");
    }
}
