//! 快取管理器與版本標記器配置

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::fallback::DEFAULT_OFFLINE_MESSAGE;
use crate::{PwaError, Result};

/// 快取管理器配置（建構時注入）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheManagerConfig {
    /// 目前世代的快取名稱（例如 `educalc-v3`）
    pub cache_name: String,

    /// 來源，用於解析根相對 URL
    pub origin: String,

    /// 安裝時預先快取的應用外殼
    pub precache: Vec<String>,

    /// 後端運算服務路徑（永不快取）
    pub api_paths: Vec<String>,

    /// 離線後備回應使用的訊息
    pub offline_message: String,
}

impl CacheManagerConfig {
    /// 創建新的配置，其餘欄位使用預設值
    pub fn new(cache_name: impl Into<String>) -> Self {
        Self {
            cache_name: cache_name.into(),
            ..Self::default()
        }
    }

    /// 從 JSON 檔案載入
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| PwaError::io(path, e))?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|e| PwaError::InvalidConfig(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// 建構器模式：設置來源
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    /// 建構器模式：設置預快取清單
    pub fn with_precache<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.precache = urls.into_iter().map(Into::into).collect();
        self
    }

    /// 建構器模式：設置 API 路徑
    pub fn with_api_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.api_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    /// 建構器模式：設置離線訊息
    pub fn with_offline_message(mut self, message: impl Into<String>) -> Self {
        self.offline_message = message.into();
        self
    }

    /// 解析後的來源 URL
    pub fn origin_url(&self) -> Result<Url> {
        Url::parse(&self.origin).map_err(|e| PwaError::InvalidUrl(format!("{}: {e}", self.origin)))
    }

    /// 檢查配置是否可用
    pub fn validate(&self) -> Result<()> {
        if self.cache_name.trim().is_empty() {
            return Err(PwaError::InvalidConfig("cache_name 不可為空".to_string()));
        }

        self.origin_url()?;

        if let Some(url) = self.precache.iter().find(|u| !u.starts_with('/')) {
            return Err(PwaError::InvalidConfig(format!(
                "預快取 URL 必須為根相對路徑: {url}"
            )));
        }

        if let Some(path) = self.api_paths.iter().find(|p| !p.starts_with('/')) {
            return Err(PwaError::InvalidConfig(format!(
                "API 路徑必須以 / 開頭: {path}"
            )));
        }

        Ok(())
    }
}

impl Default for CacheManagerConfig {
    fn default() -> Self {
        Self {
            cache_name: "educalc-v1".to_string(),
            origin: "http://localhost:8080/".to_string(),
            precache: ["/", "/index.html", "/styles.css", "/app.js", "/manifest.json"]
                .into_iter()
                .map(String::from)
                .collect(),
            api_paths: ["/calculate", "/validate", "/operations", "/health"]
                .into_iter()
                .map(String::from)
                .collect(),
            offline_message: DEFAULT_OFFLINE_MESSAGE.to_string(),
        }
    }
}

/// 版本標記器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StamperConfig {
    /// 部署目錄
    pub deploy_dir: PathBuf,

    /// 主文件（必要）
    pub index_file: String,

    /// Manifest（必要）
    pub manifest_file: String,

    /// 快取管理器腳本（可選）
    pub worker_file: String,

    /// 主文件引用的樣式表
    pub stylesheet: String,

    /// 主文件引用的腳本
    pub script: String,
}

impl StamperConfig {
    /// 創建新的配置
    pub fn new(deploy_dir: impl Into<PathBuf>) -> Self {
        Self {
            deploy_dir: deploy_dir.into(),
            ..Self::default()
        }
    }

    /// 建構器模式：設置主文件名稱
    pub fn with_index_file(mut self, name: impl Into<String>) -> Self {
        self.index_file = name.into();
        self
    }

    /// 建構器模式：設置 manifest 名稱
    pub fn with_manifest_file(mut self, name: impl Into<String>) -> Self {
        self.manifest_file = name.into();
        self
    }

    /// 建構器模式：設置快取管理器腳本名稱
    pub fn with_worker_file(mut self, name: impl Into<String>) -> Self {
        self.worker_file = name.into();
        self
    }

    /// 建構器模式：設置樣式表名稱
    pub fn with_stylesheet(mut self, name: impl Into<String>) -> Self {
        self.stylesheet = name.into();
        self
    }

    /// 建構器模式：設置腳本名稱
    pub fn with_script(mut self, name: impl Into<String>) -> Self {
        self.script = name.into();
        self
    }

    pub fn index_path(&self) -> PathBuf {
        self.deploy_dir.join(&self.index_file)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.deploy_dir.join(&self.manifest_file)
    }

    pub fn worker_path(&self) -> PathBuf {
        self.deploy_dir.join(&self.worker_file)
    }
}

impl Default for StamperConfig {
    fn default() -> Self {
        Self {
            deploy_dir: PathBuf::from("frontend"),
            index_file: "index.html".to_string(),
            manifest_file: "manifest.json".to_string(),
            worker_file: "sw.js".to_string(),
            stylesheet: "styles.css".to_string(),
            script: "app.js".to_string(),
        }
    }
}
