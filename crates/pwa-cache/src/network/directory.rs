//! 本機部署目錄來源（開發用，無快取標頭）

use async_trait::async_trait;
use pwa_core::mime::content_type_for;
use pwa_core::{Method, PwaError, Request, Response, Result};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

use super::Network;

/// 直接從部署目錄提供檔案
///
/// 每個回應都帶禁止快取的標頭，讓瀏覽器層的 HTTP 快取不會干擾
/// 具名儲存的行為。
#[derive(Debug, Clone)]
pub struct DirectoryOrigin {
    root: PathBuf,
}

impl DirectoryOrigin {
    /// 以部署目錄建立
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// 將 URL 路徑對應到檔案；含 `..` 的路徑不對應
    fn resolve(&self, url_path: &str) -> Option<PathBuf> {
        let relative = url_path.trim_start_matches('/');
        let mut path = self.root.clone();
        for component in Path::new(relative).components() {
            match component {
                Component::Normal(part) => path.push(part),
                Component::CurDir => {}
                _ => return None,
            }
        }
        if relative.is_empty() || relative.ends_with('/') {
            path.push("index.html");
        }
        Some(path)
    }
}

fn no_cache(response: Response) -> Response {
    response
        .with_header("cache-control", "no-cache, no-store, must-revalidate, max-age=0")
        .with_header("pragma", "no-cache")
        .with_header("expires", "0")
}

#[async_trait]
impl Network for DirectoryOrigin {
    async fn fetch(&self, request: &Request) -> Result<Response> {
        if !matches!(request.method, Method::Get | Method::Head) {
            return Ok(no_cache(Response::new(501)));
        }

        let Some(path) = self.resolve(request.path()) else {
            return Ok(no_cache(Response::new(404)));
        };

        match fs::read(&path).await {
            Ok(body) => {
                let response = Response::new(200).with_header("content-type", content_type_for(&path));
                let response = if request.method == Method::Head {
                    response
                } else {
                    response.with_body(body)
                };
                Ok(no_cache(response))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(no_cache(Response::new(404))),
            Err(e) => {
                let is_dir = fs::metadata(&path).await.is_ok_and(|m| m.is_dir());
                if is_dir {
                    Ok(no_cache(Response::new(404)))
                } else {
                    Err(PwaError::NetworkUnavailable(format!("{}: {e}", path.display())))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use url::Url;

    fn origin() -> Url {
        Url::parse("http://localhost:8080/").unwrap()
    }

    fn deploy_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>EduCalc</h1>").unwrap();
        std::fs::write(dir.path().join("app.js"), "console.log(1)").unwrap();
        std::fs::write(dir.path().join("styles.css"), "body{}").unwrap();
        dir
    }

    #[rstest]
    #[case("/", "text/html", "<h1>EduCalc</h1>")]
    #[case("/index.html", "text/html", "<h1>EduCalc</h1>")]
    #[case("/app.js?v=20251103.00001", "application/javascript", "console.log(1)")]
    #[case("/styles.css", "text/css", "body{}")]
    #[tokio::test]
    async fn test_serves_files(#[case] raw: &str, #[case] content_type: &str, #[case] body: &str) {
        let dir = deploy_dir();
        let request = Request::get(raw, &origin()).unwrap();
        let response = DirectoryOrigin::new(dir.path()).fetch(&request).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.header("content-type"), Some(content_type));
        assert_eq!(response.text(), body);
        assert_eq!(
            response.header("cache-control"),
            Some("no-cache, no-store, must-revalidate, max-age=0")
        );
        assert_eq!(response.header("pragma"), Some("no-cache"));
        assert_eq!(response.header("expires"), Some("0"));
    }

    #[tokio::test]
    async fn test_missing_file_is_404_not_failure() {
        let dir = deploy_dir();
        let request = Request::get("/manifest.json", &origin()).unwrap();
        let response = DirectoryOrigin::new(dir.path()).fetch(&request).await.unwrap();
        assert_eq!(response.status, 404);
    }

    #[tokio::test]
    async fn test_post_not_supported() {
        let dir = deploy_dir();
        let request = Request::parse(Method::Post, "/calculate", &origin()).unwrap();
        let response = DirectoryOrigin::new(dir.path()).fetch(&request).await.unwrap();
        assert_eq!(response.status, 501);
    }

    #[test]
    fn test_resolve_rejects_parent_dir() {
        let origin = DirectoryOrigin::new("/srv/frontend");
        assert_eq!(origin.resolve("/../etc/passwd"), None);
        assert_eq!(
            origin.resolve("/icons/icon.png"),
            Some(PathBuf::from("/srv/frontend/icons/icon.png"))
        );
        assert_eq!(origin.resolve("/"), Some(PathBuf::from("/srv/frontend/index.html")));
    }
}
