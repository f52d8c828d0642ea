//! 快取管理器腳本的版本註解

use pwa_core::ReleaseVersion;

const COMMENT_PREFIX: &str = "// Version:";

/// 在首行插入或取代 `// Version: <token>`
pub fn stamp_source(source: &str, version: &ReleaseVersion) -> String {
    let comment = format!("{COMMENT_PREFIX} {version}");

    let (first_line, rest) = match source.split_once('\n') {
        Some((first, rest)) => (first, Some(rest)),
        None => (source, None),
    };

    if first_line.trim_start().starts_with(COMMENT_PREFIX) {
        let eol = if first_line.ends_with('\r') { "\r\n" } else { "\n" };
        match rest {
            Some(rest) => format!("{comment}{eol}{rest}"),
            None => comment,
        }
    } else {
        format!("{comment}\n{source}")
    }
}
