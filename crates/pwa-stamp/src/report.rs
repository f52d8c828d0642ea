//! 標記結果

use pwa_core::ReleaseVersion;
use serde::Serialize;

/// 改寫目標
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RewriteTarget {
    /// 主文件的版本 meta 標籤
    VersionMeta,
    /// 樣式表引用的 `?v=` 參數
    StylesheetQuery,
    /// 腳本引用的 `?v=` 參數
    ScriptQuery,
    /// Manifest 的 `version` / `version_name`
    ManifestFields,
    /// 快取管理器腳本的首行版本註解
    WorkerComment,
}

/// 單一改寫的結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RewriteOutcome {
    /// 已套用
    Applied,
    /// 找不到預期的樣式，跳過
    PatternNotFound,
    /// 可選檔案不存在，跳過
    ArtifactAbsent,
}

/// 一次標記的結果
#[derive(Debug, Clone, Serialize)]
pub struct StampReport {
    /// 本次寫入的版本
    pub version: ReleaseVersion,

    /// 依執行順序記錄的改寫結果
    pub rewrites: Vec<(RewriteTarget, RewriteOutcome)>,
}

impl StampReport {
    /// 創建空的結果
    pub fn new(version: ReleaseVersion) -> Self {
        Self {
            version,
            rewrites: Vec::new(),
        }
    }

    /// 記錄改寫結果
    pub fn record(&mut self, target: RewriteTarget, outcome: RewriteOutcome) {
        self.rewrites.push((target, outcome));
    }

    /// 取得某目標的結果
    pub fn outcome(&self, target: RewriteTarget) -> Option<RewriteOutcome> {
        self.rewrites
            .iter()
            .find(|(t, _)| *t == target)
            .map(|(_, outcome)| *outcome)
    }

    /// 被跳過的目標
    pub fn skipped(&self) -> Vec<RewriteTarget> {
        self.rewrites
            .iter()
            .filter(|(_, outcome)| *outcome != RewriteOutcome::Applied)
            .map(|(target, _)| *target)
            .collect()
    }

    /// 是否所有嵌入點都已寫入
    pub fn is_complete(&self) -> bool {
        self.skipped().is_empty()
    }

    /// 部署工具讀取的狀態行
    pub fn status_line(&self) -> String {
        format!("✅ 版本已更新: {}", self.version)
    }
}
