//! 版本標記主流程

use pwa_core::{PwaError, ReleaseVersion, Result, StamperConfig};
use std::io::ErrorKind;
use std::path::Path;

use crate::document::DocumentRewriter;
use crate::report::{RewriteOutcome, RewriteTarget, StampReport};
use crate::{manifest, worker};

/// 版本標記器
///
/// 依序處理主文件、manifest、快取管理器腳本。主文件或 manifest
/// 不存在時中止；已寫入的檔案不會回滾。
pub struct VersionStamper {
    config: StamperConfig,
    document: DocumentRewriter,
}

impl VersionStamper {
    /// 創建新的標記器
    pub fn new(config: StamperConfig) -> Result<Self> {
        let document = DocumentRewriter::new(&config.stylesheet, &config.script)?;
        Ok(Self { config, document })
    }

    pub fn config(&self) -> &StamperConfig {
        &self.config
    }

    /// 以新產生的版本執行標記
    pub fn run(&self) -> Result<StampReport> {
        self.stamp(ReleaseVersion::now())
    }

    /// 以指定版本執行標記
    pub fn stamp(&self, version: ReleaseVersion) -> Result<StampReport> {
        tracing::info!(
            "開始版本標記：版本 {}，部署目錄 {}",
            version,
            self.config.deploy_dir.display()
        );

        let mut report = StampReport::new(version);

        // Step 1: 主文件（必要）
        let index_path = self.config.index_path();
        let html = read_required(&index_path)?;
        let (html, outcomes) = self.document.rewrite(&html, &report.version);
        write(&index_path, &html)?;
        for (target, outcome) in outcomes {
            report.record(target, outcome);
        }
        tracing::debug!("主文件已處理: {}", index_path.display());

        // Step 2: manifest（必要）
        let manifest_path = self.config.manifest_path();
        let raw = read_required(&manifest_path)?;
        let rewritten = manifest::rewrite(&raw, &report.version, &manifest_path)?;
        write(&manifest_path, &rewritten)?;
        report.record(RewriteTarget::ManifestFields, RewriteOutcome::Applied);
        tracing::debug!("manifest 已處理: {}", manifest_path.display());

        // Step 3: 快取管理器腳本（可選）
        let worker_path = self.config.worker_path();
        match read_optional(&worker_path)? {
            Some(source) => {
                write(&worker_path, &worker::stamp_source(&source, &report.version))?;
                report.record(RewriteTarget::WorkerComment, RewriteOutcome::Applied);
            }
            None => {
                tracing::debug!("快取管理器腳本不存在，跳過: {}", worker_path.display());
                report.record(RewriteTarget::WorkerComment, RewriteOutcome::ArtifactAbsent);
            }
        }

        let skipped = report.skipped();
        if skipped.is_empty() {
            tracing::info!("版本標記完成: {}", report.version);
        } else {
            tracing::info!("版本標記完成: {}，略過 {:?}", report.version, skipped);
        }

        Ok(report)
    }
}

fn read_required(path: &Path) -> Result<String> {
    read_optional(path)?.ok_or_else(|| PwaError::MissingArtifact(path.to_path_buf()))
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(PwaError::io(path, e)),
    }
}

fn write(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).map_err(|e| PwaError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const INDEX: &str = r#"<html><head>
<meta name="version" content="old">
<link rel="stylesheet" href="styles.css?v=old">
</head><body><script src="app.js?v=old"></script></body></html>"#;

    const MANIFEST: &str = r#"{"name":"EduCalc","version":"old","version_name":"old"}"#;

    fn deploy_dir(with_worker: bool) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.html"), INDEX).unwrap();
        fs::write(dir.path().join("manifest.json"), MANIFEST).unwrap();
        if with_worker {
            fs::write(dir.path().join("sw.js"), "const CACHE_NAME = 'educalc-v1';\n").unwrap();
        }
        dir
    }

    fn stamper(dir: &TempDir) -> VersionStamper {
        VersionStamper::new(StamperConfig::new(dir.path())).unwrap()
    }

    #[test]
    fn test_stamp_all_artifacts() {
        let dir = deploy_dir(true);
        let report = stamper(&dir)
            .stamp(ReleaseVersion::from_token("20251103.00042"))
            .unwrap();

        assert!(report.is_complete());
        assert_eq!(report.rewrites.len(), 5);

        let html = fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert!(html.contains(r#"content="20251103.00042""#));
        assert!(html.contains("styles.css?v=20251103.00042"));
        assert!(html.contains("app.js?v=20251103.00042"));

        let manifest: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("manifest.json")).unwrap())
                .unwrap();
        assert_eq!(manifest["version"], "20251103.00042");
        assert_eq!(manifest["version_name"], "20251103.00042");
        assert_eq!(manifest["name"], "EduCalc");

        let sw = fs::read_to_string(dir.path().join("sw.js")).unwrap();
        assert!(sw.starts_with("// Version: 20251103.00042\n"));
    }

    #[test]
    fn test_missing_worker_is_not_an_error() {
        let dir = deploy_dir(false);
        let report = stamper(&dir).stamp(ReleaseVersion::from_token("T")).unwrap();

        assert_eq!(
            report.outcome(RewriteTarget::WorkerComment),
            Some(RewriteOutcome::ArtifactAbsent)
        );
        assert!(!dir.path().join("sw.js").exists());
    }

    #[test]
    fn test_missing_index_aborts() {
        let dir = deploy_dir(true);
        fs::remove_file(dir.path().join("index.html")).unwrap();

        let err = stamper(&dir).stamp(ReleaseVersion::from_token("T")).unwrap_err();
        assert!(matches!(err, PwaError::MissingArtifact(_)));

        // 中止後不再處理後續檔案
        let manifest = fs::read_to_string(dir.path().join("manifest.json")).unwrap();
        assert_eq!(manifest, MANIFEST);
    }

    #[test]
    fn test_missing_manifest_aborts_after_partial_write() {
        let dir = deploy_dir(true);
        fs::remove_file(dir.path().join("manifest.json")).unwrap();

        let err = stamper(&dir).stamp(ReleaseVersion::from_token("T")).unwrap_err();
        assert!(matches!(err, PwaError::MissingArtifact(ref p) if p.ends_with("manifest.json")));
        assert_eq!(err.exit_code(), 1);

        // 不具交易性：主文件已寫入，腳本未處理
        let html = fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert!(html.contains(r#"content="T""#));
        let sw = fs::read_to_string(dir.path().join("sw.js")).unwrap();
        assert!(!sw.contains("Version"));
    }

    #[test]
    fn test_run_generates_fresh_version() {
        let dir = deploy_dir(true);
        let report = stamper(&dir).run().unwrap();

        let html = fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert!(html.contains(&format!(r#"content="{}""#, report.version)));
    }
}
