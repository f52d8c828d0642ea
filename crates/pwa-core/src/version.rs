//! 發布版本標記

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 發布版本（一次部署一個）
///
/// 格式為 `YYYYMMDD.SSSSS`：UTC 日期加上當日秒數。
/// 同一秒內的兩次呼叫會產生相同標記。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReleaseVersion(String);

impl ReleaseVersion {
    /// 以目前時間產生新版本
    pub fn now() -> Self {
        Self::at(Utc::now())
    }

    /// 以指定時間產生版本
    pub fn at(timestamp: DateTime<Utc>) -> Self {
        Self(format!(
            "{}.{:05}",
            timestamp.format("%Y%m%d"),
            timestamp.num_seconds_from_midnight()
        ))
    }

    /// 使用既有標記（例如命令列指定）
    pub fn from_token(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ReleaseVersion {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_version_format() {
        let ts = Utc.with_ymd_and_hms(2025, 11, 3, 1, 2, 3).unwrap();
        assert_eq!(ReleaseVersion::at(ts).as_str(), "20251103.03723");
    }

    #[test]
    fn test_distinct_seconds_give_distinct_versions() {
        let first = Utc.with_ymd_and_hms(2025, 11, 3, 10, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2025, 11, 3, 10, 0, 1).unwrap();
        assert_ne!(ReleaseVersion::at(first), ReleaseVersion::at(second));
    }

    #[test]
    fn test_same_second_collides() {
        let ts = Utc.with_ymd_and_hms(2025, 11, 3, 10, 0, 0).unwrap();
        let later = ts + chrono::Duration::milliseconds(400);
        assert_eq!(ReleaseVersion::at(ts), ReleaseVersion::at(later));
    }

    #[test]
    fn test_from_token() {
        let version = ReleaseVersion::from_token("manual-1");
        assert_eq!(version.to_string(), "manual-1");
    }
}
