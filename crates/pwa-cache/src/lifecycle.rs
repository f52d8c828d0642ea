//! 快取管理器生命週期

use serde::Serialize;
use std::fmt;

/// 生命週期狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LifecycleState {
    /// 尚未安裝
    Unregistered,
    /// 預快取中
    Installing,
    /// 安裝完成，等待啟用
    Installed,
    /// 清理舊世代儲存中
    Activating,
    /// 控制頁面並處理請求
    Active,
    /// 已被新世代取代（進行中的請求仍會完成）
    Replaced,
    /// 安裝失敗，不會成為目前世代
    Redundant,
}

impl LifecycleState {
    /// 檢查狀態轉換是否合法
    pub fn can_transition_to(self, next: LifecycleState) -> bool {
        use LifecycleState::*;
        matches!(
            (self, next),
            (Unregistered, Installing)
                | (Installing, Installed)
                | (Installing, Redundant)
                | (Installed, Activating)
                | (Installed, Redundant)
                | (Activating, Active)
                | (Active, Replaced)
        )
    }

    /// 是否可以處理攔截的請求
    pub fn handles_fetches(self) -> bool {
        matches!(self, LifecycleState::Active | LifecycleState::Replaced)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Unregistered => "UNREGISTERED",
            LifecycleState::Installing => "INSTALLING",
            LifecycleState::Installed => "INSTALLED",
            LifecycleState::Activating => "ACTIVATING",
            LifecycleState::Active => "ACTIVE",
            LifecycleState::Replaced => "REPLACED",
            LifecycleState::Redundant => "REDUNDANT",
        };
        f.write_str(name)
    }
}
