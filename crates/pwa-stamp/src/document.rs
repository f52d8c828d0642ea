//! 主文件改寫

use pwa_core::{PwaError, ReleaseVersion, Result};
use regex::{Captures, Regex};

use crate::report::{RewriteOutcome, RewriteTarget};

/// 主文件改寫器
///
/// 每個樣式只改寫第一個匹配；找不到就原樣保留。
pub struct DocumentRewriter {
    version_meta: Regex,
    stylesheet: Regex,
    script: Regex,
}

impl DocumentRewriter {
    /// 依樣式表與腳本檔名建立改寫器
    pub fn new(stylesheet: &str, script: &str) -> Result<Self> {
        Ok(Self {
            version_meta: compile(r#"(<meta\s+name=["']version["']\s+content=["'])[^"']*(["'])"#)?,
            stylesheet: compile(&asset_query_pattern("href", stylesheet))?,
            script: compile(&asset_query_pattern("src", script))?,
        })
    }

    /// 改寫文件內容，回傳新內容與各目標的結果
    pub fn rewrite(
        &self,
        html: &str,
        version: &ReleaseVersion,
    ) -> (String, Vec<(RewriteTarget, RewriteOutcome)>) {
        let token = version.as_str();
        let mut outcomes = Vec::with_capacity(3);

        let (html, outcome) = replace_first(&self.version_meta, html, |caps| {
            format!("{}{}{}", &caps[1], token, &caps[2])
        });
        outcomes.push((RewriteTarget::VersionMeta, outcome));

        let (html, outcome) =
            replace_first(&self.stylesheet, &html, |caps| format!("{}{}", &caps[1], token));
        outcomes.push((RewriteTarget::StylesheetQuery, outcome));

        let (html, outcome) =
            replace_first(&self.script, &html, |caps| format!("{}{}", &caps[1], token));
        outcomes.push((RewriteTarget::ScriptQuery, outcome));

        (html, outcomes)
    }
}

/// `href="css/styles.css?v=..."` 之類的引用，群組 1 保留到 `?v=` 為止
fn asset_query_pattern(attribute: &str, asset: &str) -> String {
    format!(
        r#"({attribute}=["'](?:[^"']*/)?{}\?v=)[^"'&]*"#,
        regex::escape(asset)
    )
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| PwaError::InvalidConfig(format!("無效的改寫樣式: {e}")))
}

fn replace_first(
    regex: &Regex,
    text: &str,
    replacement: impl Fn(&Captures<'_>) -> String,
) -> (String, RewriteOutcome) {
    if !regex.is_match(text) {
        tracing::debug!("找不到改寫樣式，跳過: {}", regex.as_str());
        return (text.to_string(), RewriteOutcome::PatternNotFound);
    }

    let replaced = regex.replacen(text, 1, |caps: &Captures<'_>| replacement(caps));
    (replaced.into_owned(), RewriteOutcome::Applied)
}
