//! # PWA Stamp
//!
//! 發布時的版本標記器：把新版本寫入主文件、manifest 與快取管理器腳本

pub mod document;
pub mod manifest;
pub mod report;
pub mod stamper;
pub mod worker;

// Re-export 主要類型
pub use document::DocumentRewriter;
pub use report::{RewriteOutcome, RewriteTarget, StampReport};
pub use stamper::VersionStamper;
