//! 發布版本標記命令列
//!
//! 成功時在 stdout 印出狀態行，日誌寫到 stderr。

use clap::Parser;
use pwa_core::{PwaError, ReleaseVersion, StamperConfig};
use pwa_stamp::VersionStamper;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pwa-stamp", version, about = "將新的發布版本寫入部署檔案")]
struct Cli {
    /// 部署目錄
    #[arg(long, env = "PWA_DEPLOY_DIR", default_value = "frontend")]
    deploy_dir: PathBuf,

    /// 主文件名稱
    #[arg(long, default_value = "index.html")]
    index: String,

    /// Manifest 名稱
    #[arg(long, default_value = "manifest.json")]
    manifest: String,

    /// 快取管理器腳本名稱
    #[arg(long, default_value = "sw.js")]
    worker: String,

    /// 主文件引用的樣式表
    #[arg(long, default_value = "styles.css")]
    stylesheet: String,

    /// 主文件引用的腳本
    #[arg(long, default_value = "app.js")]
    script: String,

    /// 指定版本（預設依目前時間產生）
    #[arg(long = "release")]
    release: Option<String>,

    /// 以 JSON 輸出完整結果
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn config(&self) -> StamperConfig {
        StamperConfig::new(&self.deploy_dir)
            .with_index_file(&self.index)
            .with_manifest_file(&self.manifest)
            .with_worker_file(&self.worker)
            .with_stylesheet(&self.stylesheet)
            .with_script(&self.script)
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let stamper = VersionStamper::new(cli.config())?;
    let version = cli
        .release
        .as_deref()
        .map(ReleaseVersion::from_token)
        .unwrap_or_else(ReleaseVersion::now);

    let report = stamper.stamp(version)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for target in report.skipped() {
            eprintln!("⚠️  略過: {target:?}");
        }
        println!("{}", report.status_line());
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ 版本標記失敗: {e}");
            let code = e
                .downcast_ref::<PwaError>()
                .map(PwaError::exit_code)
                .unwrap_or(1);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}
